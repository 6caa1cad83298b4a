//! Glyphpack Atlas - rectangle packing for glyph atlases
//!
//! This crate defines the [`PackingOracle`] contract used by the font atlas
//! builder and ships a default implementation, [`TreePacker`]:
//! - **Single region**: packs every rectangle into one region whose size is
//!   chosen by the packer.
//! - **Multiple regions**: packs rectangles into as few fixed-size pages as
//!   the heuristic finds, tagging each rectangle with its page.
//!
//! Rectangles are never rotated. Zero-area rectangles are accepted, occupy no
//! space and are reported at the origin of page 0.
//!
//! ```rust
//! use glyphpack_atlas::{PackingOracle, TreePacker};
//! use glyphpack_core::geometry::Size;
//!
//! let packer = TreePacker::default();
//! let result = packer
//!     .pack_single(&[Size::new(8, 8), Size::new(4, 12)])
//!     .unwrap();
//! assert!(result.bounds.width >= 8);
//! ```

mod error;
mod oracle;
mod tree;

pub use error::{PackError, PackResult};
pub use oracle::{MultiPack, PackingOracle, PagePlacement, SinglePack, TreePacker};

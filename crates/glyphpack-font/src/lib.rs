//! Glyphpack Font - bitmap fonts for texture atlases
//!
//! This crate turns the glyph stream emitted by an external rasterizer into
//! a runtime-ready bitmap font:
//! - **Parsing**: [`parse_stream`] reads the line protocol into a [`Font`]
//! - **Subsetting**: [`subset`] keeps only glyphs reachable from a charset
//! - **Quantization**: [`quantize_font`] snaps bitmaps to a [`SizedFormat`]
//! - **Packing**: [`pack_font`] places every glyph into one or more atlas pages
//! - **Output**: [`write_asset`], [`write_fallback`] and [`render_grid`]
//!
//! ## Quick Start
//!
//! ```rust
//! use glyphpack_atlas::TreePacker;
//! use glyphpack_font::{FallbackPolicy, parse_stream, pack_font, subset};
//!
//! let stream = b"metrics 10 -2 12\nchar 65 1\nglyph 0 0 0 0 0 .notdef \nglyph 1 1 0 0 2 A ff\n";
//! let font = parse_stream(stream).unwrap();
//! let required = [65].into_iter().collect();
//! let mut font = subset(&font, &required, FallbackPolicy::Keep);
//! let atlas = pack_font(&mut font, None, &TreePacker::default()).unwrap();
//! assert_eq!(atlas.dimensions(), (1, 1));
//! ```

pub mod asset;
pub mod charset;
pub mod error;
pub mod fallback;
pub mod font;
pub mod format;
pub mod grid;
pub mod pack;
pub mod stream;
pub mod subset;

pub use asset::{ASSET_MAGIC, ASSET_VERSION, write_asset};
pub use charset::{parse_charset, read_charset};
pub use error::{
    AssetError, AssetResult, CharsetError, CharsetResult, FormatError, FormatResult, ParseError,
    ParseErrorKind, ParseResult,
};
pub use fallback::write_fallback;
pub use font::{Font, Glyph, Metrics, Placement};
pub use format::{Dither, PixelFormat, SizedFormat, make_monochrome, quantize_font};
pub use grid::render_grid;
pub use pack::pack_font;
pub use stream::{MAX_GLYPH_DIMENSION, parse_stream, write_stream};
pub use subset::{FallbackPolicy, subset};

// Re-export packing types used in this crate's API
pub use glyphpack_atlas::{PackError, PackResult, PackingOracle};
pub use glyphpack_core::geometry::{Pos, Size};
pub use image::RgbaImage;

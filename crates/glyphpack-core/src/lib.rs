//! Glyphpack Core
//!
//! Shared building blocks for the glyphpack crates: logging bootstrap,
//! integer geometry and hash collection aliases.

pub mod alloc;
pub mod geometry;
pub mod logging;

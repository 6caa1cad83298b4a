//! Hash collection aliases.
//!
//! All glyphpack crates use AHash-backed collections for code point and
//! glyph index lookups.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

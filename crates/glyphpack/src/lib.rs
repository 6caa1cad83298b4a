//! Glyphpack - vector fonts to bitmap glyph atlases
//!
//! The binary runs an external rasterizer over a font file, then sends its
//! glyph stream through the [`glyphpack_font`] pipeline: optional subsetting,
//! monochrome thresholding and quantization, a diagnostic grid, a fallback
//! font, and finally atlas packing with texture and asset output.
//!
//! [`run`] drives one conversion from validated [`Options`]. The rasterizer
//! and packing oracle are passed in, so the whole pipeline can be exercised
//! without spawning processes.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raster;

pub use cli::Args;
pub use config::Options;
pub use error::{ConfigError, ConfigResult, Phase, PipelineError, PipelineResult, RasterError, RasterResult};
pub use pipeline::run;
pub use raster::{Rasterizer, SubprocessRasterizer};

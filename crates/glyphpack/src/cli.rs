//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glyphpack_font::Dither;

/// Rasterize a font and pack its glyphs into texture atlases.
#[derive(Debug, Clone, Parser)]
#[command(name = "glyphpack", version, about)]
pub struct Args {
    /// Font file to rasterize.
    #[arg(long, value_name = "PATH")]
    pub font: PathBuf,

    /// Point size to rasterize the font at.
    #[arg(long)]
    pub size: u32,

    /// Character set file restricting which glyphs are kept.
    #[arg(long, value_name = "PATH")]
    pub charset: Option<PathBuf>,

    /// Drop the .notdef glyph unless a requested character maps to it.
    #[arg(long)]
    pub remove_notdef: bool,

    /// Pack into multiple pages of this size.
    #[arg(long, value_name = "WIDTH:HEIGHT")]
    pub texture_size: Option<String>,

    /// Texture format for quantization and asset output.
    #[arg(long, value_name = "FORMAT.SIZE")]
    pub format: Option<String>,

    /// Dithering applied when quantizing.
    #[arg(long, value_enum, default_value_t = DitherArg::None)]
    pub dither: DitherArg,

    /// Render monochrome (1-bit) instead of grayscale.
    #[arg(long)]
    pub mono: bool,

    /// Grid preview output image.
    #[arg(long, value_name = "PATH")]
    pub out_grid: Option<PathBuf>,

    /// Packed texture output image.
    #[arg(long, value_name = "PATH")]
    pub out_texture: Option<PathBuf>,

    /// Binary font asset output.
    #[arg(long, value_name = "PATH")]
    pub out_data: Option<PathBuf>,

    /// Fixed-cell fallback font output.
    #[arg(long, value_name = "PATH")]
    pub out_fallback: Option<PathBuf>,

    /// Rasterizer executable.
    #[arg(long, value_name = "PATH", env = "GLYPHPACK_RASTERIZER", default_value = "raster")]
    pub rasterizer: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DitherArg {
    None,
    Ordered,
}

impl From<DitherArg> for Dither {
    fn from(value: DitherArg) -> Self {
        match value {
            DitherArg::None => Dither::None,
            DitherArg::Ordered => Dither::Ordered,
        }
    }
}

//! Validated run options.

use std::path::PathBuf;

use glyphpack_core::alloc::HashSet;
use glyphpack_core::geometry::Size;
use glyphpack_font::{Dither, FallbackPolicy, SizedFormat, read_charset};

use crate::cli::Args;
use crate::error::{ConfigError, ConfigResult};

/// Smallest point size the rasterizer is asked for.
pub const MIN_SIZE: u32 = 4;
/// Largest point size the rasterizer is asked for.
pub const MAX_SIZE: u32 = 16 * 1024;

/// Largest page width or height accepted for `--texture-size`.
pub const MAX_TEXTURE_DIMENSION: u32 = 16 * 1024;

/// Everything one conversion run needs, checked for consistency.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub font: PathBuf,
    pub size: u32,
    /// Code points to keep; `None` keeps the whole font.
    pub charset: Option<HashSet<u32>>,
    pub fallback: FallbackPolicy,
    /// Fixed page size; `None` packs into a single region.
    pub page_size: Option<Size<u32>>,
    pub format: Option<SizedFormat>,
    pub dither: Dither,
    pub mono: bool,
    pub grid: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub fallback_font: Option<PathBuf>,
    pub rasterizer: PathBuf,
}

impl Options {
    /// Validate command line arguments and load the charset file, if any.
    pub fn from_args(args: Args) -> ConfigResult<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&args.size) {
            return Err(ConfigError::SizeOutOfRange {
                size: args.size,
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }

        let format = args
            .format
            .as_deref()
            .map(|s| {
                let format: SizedFormat = s.parse()?;
                format.validate()?;
                Ok::<_, ConfigError>(format)
            })
            .transpose()?;
        if args.out_data.is_some() && format.is_none() {
            return Err(ConfigError::DataWithoutFormat);
        }

        let page_size = match args.texture_size.as_deref() {
            Some(value) => {
                if args.out_texture.is_none() && args.out_data.is_none() {
                    return Err(ConfigError::TextureSizeWithoutOutput);
                }
                Some(parse_texture_size(value)?)
            }
            None => None,
        };

        let charset = args.charset.as_deref().map(read_charset).transpose()?;

        Ok(Self {
            font: args.font,
            size: args.size,
            charset,
            fallback: if args.remove_notdef {
                FallbackPolicy::RemoveUnlessMapped
            } else {
                FallbackPolicy::Keep
            },
            page_size,
            format,
            dither: args.dither.into(),
            mono: args.mono,
            grid: args.out_grid,
            texture: args.out_texture,
            data: args.out_data,
            fallback_font: args.out_fallback,
            rasterizer: args.rasterizer,
        })
    }

    /// True if the font needs to be packed into an atlas.
    pub fn wants_atlas(&self) -> bool {
        self.texture.is_some() || self.data.is_some()
    }
}

/// Parse `WIDTH:HEIGHT`, both non-zero and at most [`MAX_TEXTURE_DIMENSION`].
pub fn parse_texture_size(value: &str) -> ConfigResult<Size<u32>> {
    let invalid = || ConfigError::InvalidTextureSize {
        value: value.to_string(),
    };
    let (width, height) = value.split_once(':').ok_or_else(invalid)?;
    let width: u32 = width.parse().map_err(|_| invalid())?;
    let height: u32 = height.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroTextureSize);
    }
    if width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
        return Err(ConfigError::TextureSizeTooLarge {
            width,
            height,
            limit: MAX_TEXTURE_DIMENSION,
        });
    }
    Ok(Size::new(width, height))
}

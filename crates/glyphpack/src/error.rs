//! Error types for configuration, rasterization and the conversion pipeline.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use glyphpack_atlas::PackError;
use glyphpack_font::{AssetError, CharsetError, FormatError, ParseError};

/// Invalid or inconsistent command line options.
#[derive(Debug)]
pub enum ConfigError {
    /// Point size outside the supported range.
    SizeOutOfRange {
        size: u32,
        min: u32,
        max: u32,
    },

    /// `--texture-size` given with nothing to pack for.
    TextureSizeWithoutOutput,

    /// `--out-data` given without `--format`.
    DataWithoutFormat,

    /// Texture size not of the form `WIDTH:HEIGHT`.
    InvalidTextureSize {
        value: String,
    },

    /// Texture size with a zero dimension.
    ZeroTextureSize,

    /// Texture size with a dimension above the supported maximum.
    TextureSizeTooLarge {
        width: u32,
        height: u32,
        limit: u32,
    },

    /// The texture format could not be parsed or is not supported.
    Format(FormatError),

    /// The character set file could not be read.
    Charset(CharsetError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SizeOutOfRange { size, min, max } => {
                write!(f, "invalid size {}, must be between {} and {}", size, min, max)
            }
            ConfigError::TextureSizeWithoutOutput => {
                write!(f, "cannot use --texture-size without --out-texture or --out-data")
            }
            ConfigError::DataWithoutFormat => {
                write!(f, "the --format flag must be used when using --out-data")
            }
            ConfigError::InvalidTextureSize { value } => {
                write!(f, "invalid texture size {:?}, expected WIDTH:HEIGHT", value)
            }
            ConfigError::ZeroTextureSize => write!(f, "texture size must not be zero"),
            ConfigError::TextureSizeTooLarge {
                width,
                height,
                limit,
            } => write!(
                f,
                "texture size {}:{} too large, each side must be at most {}",
                width, height, limit
            ),
            ConfigError::Format(err) => write!(f, "invalid format: {}", err),
            ConfigError::Charset(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Format(err) => Some(err),
            ConfigError::Charset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FormatError> for ConfigError {
    fn from(err: FormatError) -> Self {
        ConfigError::Format(err)
    }
}

impl From<CharsetError> for ConfigError {
    fn from(err: CharsetError) -> Self {
        ConfigError::Charset(err)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures running the external rasterizer.
#[derive(Debug)]
pub enum RasterError {
    /// The process could not be started.
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The process ran but did not exit successfully.
    Status {
        program: PathBuf,
        status: ExitStatus,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::Spawn { program, source } => {
                write!(f, "could not run '{}': {}", program.display(), source)
            }
            RasterError::Status { program, status } => {
                write!(f, "'{}' failed: {}", program.display(), status)
            }
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::Spawn { source, .. } => Some(source),
            RasterError::Status { .. } => None,
        }
    }
}

pub type RasterResult<T> = Result<T, RasterError>;

/// Pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Config,
    Rasterize,
    Parse,
    Quantize,
    Grid,
    Fallback,
    Pack,
    Serialize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Config => "config",
            Phase::Rasterize => "rasterize",
            Phase::Parse => "parse",
            Phase::Quantize => "quantize",
            Phase::Grid => "grid",
            Phase::Fallback => "fallback",
            Phase::Pack => "pack",
            Phase::Serialize => "serialize",
        };
        f.write_str(name)
    }
}

/// Any error that aborts a conversion.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Raster(RasterError),
    Parse(ParseError),
    Quantize(FormatError),
    Pack(PackError),

    /// Building the fallback font failed.
    Fallback(AssetError),

    /// Building the binary asset failed.
    Serialize(AssetError),

    /// Writing an output file failed.
    Io {
        phase: Phase,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Encoding an output image failed.
    Image {
        phase: Phase,
        path: PathBuf,
        source: image::ImageError,
    },
}

impl PipelineError {
    /// The stage that failed.
    pub fn phase(&self) -> Phase {
        match self {
            PipelineError::Config(_) => Phase::Config,
            PipelineError::Raster(_) => Phase::Rasterize,
            PipelineError::Parse(_) => Phase::Parse,
            PipelineError::Quantize(_) => Phase::Quantize,
            PipelineError::Pack(_) => Phase::Pack,
            PipelineError::Fallback(_) => Phase::Fallback,
            PipelineError::Serialize(_) => Phase::Serialize,
            PipelineError::Io { phase, .. } | PipelineError::Image { phase, .. } => *phase,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(err) => write!(f, "config: {}", err),
            PipelineError::Raster(err) => write!(f, "rasterize: {}", err),
            PipelineError::Parse(err) => write!(f, "parse: {}", err),
            PipelineError::Quantize(err) => write!(f, "quantize: {}", err),
            PipelineError::Pack(err) => write!(f, "pack: {}", err),
            PipelineError::Fallback(err) => write!(f, "fallback: {}", err),
            PipelineError::Serialize(err) => write!(f, "serialize: {}", err),
            PipelineError::Io {
                phase,
                path,
                source,
            } => write!(f, "{}: could not write '{}': {}", phase, path.display(), source),
            PipelineError::Image {
                phase,
                path,
                source,
            } => write!(f, "{}: could not write '{}': {}", phase, path.display(), source),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Config(err) => Some(err),
            PipelineError::Raster(err) => Some(err),
            PipelineError::Parse(err) => Some(err),
            PipelineError::Quantize(err) => Some(err),
            PipelineError::Pack(err) => Some(err),
            PipelineError::Fallback(err) | PipelineError::Serialize(err) => Some(err),
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Image { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

impl From<RasterError> for PipelineError {
    fn from(err: RasterError) -> Self {
        PipelineError::Raster(err)
    }
}

impl From<ParseError> for PipelineError {
    fn from(err: ParseError) -> Self {
        PipelineError::Parse(err)
    }
}

impl From<PackError> for PipelineError {
    fn from(err: PackError) -> Self {
        PipelineError::Pack(err)
    }
}

/// Result type alias for a conversion run.
pub type PipelineResult<T> = Result<T, PipelineError>;

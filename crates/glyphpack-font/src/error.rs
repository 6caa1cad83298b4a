//! Error types for the font pipeline.

use std::fmt;
use std::path::PathBuf;

/// A glyph stream record that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number of the offending record.
    pub line: usize,
    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

/// The reason a glyph stream record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The record tag is not one of `metrics`, `char` or `glyph`.
    UnknownRecord {
        /// The tag as found in the stream.
        tag: String,
    },

    /// The record has the wrong number of fields for its tag.
    FieldCount {
        /// Record tag.
        record: &'static str,
        /// Fields found after the tag.
        found: usize,
        /// Fields required after the tag.
        expected: usize,
    },

    /// A numeric field did not parse.
    InvalidNumber {
        /// Record tag.
        record: &'static str,
        /// Name of the field.
        field: &'static str,
        /// The field as found in the stream.
        value: String,
    },

    /// A glyph has a negative width or height.
    NegativeSize {
        /// Index the glyph would have had.
        glyph: usize,
        width: i32,
        height: i32,
    },

    /// A glyph is larger than the allowed maximum in either dimension.
    GlyphTooLarge {
        /// Index the glyph would have had.
        glyph: usize,
        width: i32,
        height: i32,
        /// Largest allowed dimension.
        limit: u32,
    },

    /// The hex bitmap does not have exactly two characters per pixel.
    BitmapLength {
        /// Index the glyph would have had.
        glyph: usize,
        /// Characters found.
        found: usize,
        /// Characters required.
        expected: usize,
    },

    /// The hex bitmap contains a non-hex character.
    InvalidHex {
        /// Index the glyph would have had.
        glyph: usize,
        /// Byte offset within the bitmap field.
        offset: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownRecord { tag } => write!(f, "unknown record: {:?}", tag),
            ParseErrorKind::FieldCount {
                record,
                found,
                expected,
            } => write!(f, "{} has {} fields, expect {}", record, found, expected),
            ParseErrorKind::InvalidNumber {
                record,
                field,
                value,
            } => write!(f, "invalid {} {} {:?}", record, field, value),
            ParseErrorKind::NegativeSize {
                glyph,
                width,
                height,
            } => write!(f, "glyph {} has negative size: {}x{}", glyph, width, height),
            ParseErrorKind::GlyphTooLarge {
                glyph,
                width,
                height,
                limit,
            } => write!(
                f,
                "glyph {} size too large: {}x{} (limit {})",
                glyph, width, height, limit
            ),
            ParseErrorKind::BitmapLength {
                glyph,
                found,
                expected,
            } => write!(
                f,
                "glyph {} data is {} characters, expected {}",
                glyph, found, expected
            ),
            ParseErrorKind::InvalidHex { glyph, offset } => {
                write!(f, "glyph {} data has invalid hex at offset {}", glyph, offset)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Result type alias for glyph stream parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors for texture format names and quantization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The string is not of the form `FORMAT.SIZE`.
    Malformed { value: String },

    /// The format name is not recognized.
    UnknownFormat { name: String },

    /// The format and size are recognized but cannot be produced.
    Unsupported { format: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Malformed { value } => {
                write!(f, "invalid texture format {:?}, expected FORMAT.SIZE", value)
            }
            FormatError::UnknownFormat { name } => write!(f, "unknown texture format: {:?}", name),
            FormatError::Unsupported { format } => {
                write!(f, "unsupported texture format: {}", format)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Result type alias for texture format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors produced while serializing font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The font has not been packed into textures yet.
    NotPacked,

    /// A value does not fit in its field.
    FieldOverflow {
        /// Name of the field.
        field: &'static str,
        /// The value that did not fit.
        value: i64,
    },

    /// Atlas pages do not all share one size.
    MismatchedPages,

    /// The fallback font would have an empty cell.
    EmptyCell { width: i32, height: i32 },

    /// The texture format cannot be encoded.
    Format(FormatError),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotPacked => write!(f, "font has no packed textures"),
            AssetError::FieldOverflow { field, value } => {
                write!(f, "value {} does not fit in field {}", value, field)
            }
            AssetError::MismatchedPages => write!(f, "atlas pages differ in size"),
            AssetError::EmptyCell { width, height } => {
                write!(f, "fallback cell is empty: {}x{}", width, height)
            }
            AssetError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Format(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FormatError> for AssetError {
    fn from(err: FormatError) -> Self {
        AssetError::Format(err)
    }
}

/// Result type alias for serialization.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors reading a character set file.
#[derive(Debug)]
pub enum CharsetError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A `U+` token is not a valid code point or range.
    InvalidCodePoint {
        /// 1-based line number.
        line: usize,
        /// The token as written.
        token: String,
    },
}

impl fmt::Display for CharsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetError::Io { path, source } => {
                write!(f, "could not read charset '{}': {}", path.display(), source)
            }
            CharsetError::InvalidCodePoint { line, token } => {
                write!(f, "line {}: invalid code point {:?}", line, token)
            }
        }
    }
}

impl std::error::Error for CharsetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CharsetError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for charset reading.
pub type CharsetResult<T> = Result<T, CharsetError>;

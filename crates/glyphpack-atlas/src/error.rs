//! Error types for rectangle packing.

use std::fmt;

use glyphpack_core::geometry::Size;

/// Errors that can occur while packing rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The packing produced a zero-sized result (nothing to place).
    EmptyTexture,

    /// A fixed page size with a zero dimension was requested.
    ZeroPageSize,

    /// A rectangle can never fit inside a page.
    RectTooLarge {
        /// Index of the rectangle in the request.
        index: usize,
        /// Size of the rectangle.
        size: Size<u32>,
        /// Page size it was packed against.
        page: Size<u32>,
    },

    /// The single-region packer exceeded its maximum region dimension.
    RegionTooLarge {
        /// Largest dimension the packer is allowed to use.
        limit: u32,
    },

    /// An oracle returned a different number of placements than requested.
    PlacementCount {
        /// Number of rectangles submitted.
        expected: usize,
        /// Number of placements returned.
        found: usize,
    },

    /// An oracle placed a rectangle outside its page or region.
    PlacementOutOfBounds {
        /// Index of the rectangle in the request.
        index: usize,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::EmptyTexture => write!(f, "empty texture"),
            PackError::ZeroPageSize => write!(f, "page size must be non-zero"),
            PackError::RectTooLarge { index, size, page } => {
                write!(f, "rectangle {} ({}) does not fit in a {} page", index, size, page)
            }
            PackError::RegionTooLarge { limit } => {
                write!(f, "rectangles do not fit in a region of at most {}x{}", limit, limit)
            }
            PackError::PlacementCount { expected, found } => {
                write!(f, "packer returned {} placements for {} rectangles", found, expected)
            }
            PackError::PlacementOutOfBounds { index } => {
                write!(f, "packer placed rectangle {} out of bounds", index)
            }
        }
    }
}

impl std::error::Error for PackError {}

/// Result type alias for packing operations.
pub type PackResult<T> = Result<T, PackError>;

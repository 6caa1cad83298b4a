//! Fixed-cell 1-bit fallback font.
//!
//! Used by the runtime when the regular font asset is unavailable, for
//! example on a crash screen. Covers printable ASCII only.

use std::ops::RangeInclusive;

use crate::asset::put_u16;
use crate::error::{AssetError, AssetResult};
use crate::font::Font;

/// Characters included in the fallback font.
pub const FALLBACK_RANGE: RangeInclusive<u32> = 32..=126;

/// Coverage at or above this value sets a bit.
const THRESHOLD: u8 = 0x80;

/// Serialize the printable ASCII glyphs of `font` as a monochrome cell font.
///
/// Layout (big-endian): `u16 cell width, u16 cell height, u16 first char,
/// u16 char count`, then for each character `cell height` rows of
/// `ceil(cell width / 8)` bytes, most significant bit leftmost. The cell
/// is as wide as the largest advance and as tall as the line height; each
/// glyph is drawn at `(cx, ascender + cy)` and clipped to its cell.
pub fn write_fallback(font: &Font) -> AssetResult<Vec<u8>> {
    let cell_width = font.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
    let cell_height = font.metrics.height;
    if cell_width <= 0 || cell_height <= 0 {
        return Err(AssetError::EmptyCell {
            width: cell_width,
            height: cell_height,
        });
    }

    let mut out = Vec::new();
    put_u16(&mut out, "cell width", cell_width as i64)?;
    put_u16(&mut out, "cell height", cell_height as i64)?;
    put_u16(&mut out, "first char", *FALLBACK_RANGE.start() as i64)?;
    put_u16(&mut out, "char count", FALLBACK_RANGE.count() as i64)?;

    let stride = (cell_width as usize).div_ceil(8);
    let cell_width = cell_width as usize;
    let cell_height = cell_height as usize;
    for codepoint in FALLBACK_RANGE {
        let mut cell = vec![0u8; stride * cell_height];
        if let Some(glyph) = font.glyph_for(codepoint) {
            let coverage = glyph.coverage();
            let origin_x = glyph.center.x as i64;
            let origin_y = font.metrics.ascender as i64 + glyph.center.y as i64;
            for (i, &value) in coverage.iter().enumerate() {
                if value < THRESHOLD {
                    continue;
                }
                let x = origin_x + (i % glyph.size.width as usize) as i64;
                let y = origin_y + (i / glyph.size.width as usize) as i64;
                if x < 0 || y < 0 || x as usize >= cell_width || y as usize >= cell_height {
                    continue;
                }
                let (x, y) = (x as usize, y as usize);
                cell[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&cell);
    }

    tracing::debug!(
        "Wrote fallback font: {}x{} cells, {} bytes",
        cell_width,
        cell_height,
        out.len()
    );
    Ok(out)
}

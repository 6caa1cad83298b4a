//! Binary font asset for the runtime.
//!
//! All values are big-endian:
//!
//! ```text
//! header   magic "GPAK", u16 version, u8 format code, u8 bits per texel,
//!          i16 ascender, i16 descender, i16 line height,
//!          u16 charmap count, u16 glyph count, u16 page count,
//!          u16 page width, u16 page height
//! charmap  (u32 code point, u16 glyph) sorted by code point
//! glyphs   u16 w, u16 h, i16 cx, i16 cy, i16 advance, u16 page, u16 x, u16 y
//! pages    texel data, see [`SizedFormat::encode`]
//! ```
//!
//! Glyphs without a placement are written with page and position zero.

use crate::error::{AssetError, AssetResult};
use crate::font::Font;
use crate::format::SizedFormat;

pub const ASSET_MAGIC: &[u8; 4] = b"GPAK";
pub const ASSET_VERSION: u16 = 1;

/// Serialize a packed, quantized font.
pub fn write_asset(font: &Font, format: SizedFormat) -> AssetResult<Vec<u8>> {
    format.validate()?;
    let first = font.textures.first().ok_or(AssetError::NotPacked)?;
    if font.textures.iter().any(|t| t.dimensions() != first.dimensions()) {
        return Err(AssetError::MismatchedPages);
    }

    let mut out = Vec::new();
    out.extend_from_slice(ASSET_MAGIC);
    out.extend_from_slice(&ASSET_VERSION.to_be_bytes());
    out.push(format.code());
    out.push(format.bits);
    put_i16(&mut out, "ascender", font.metrics.ascender as i64)?;
    put_i16(&mut out, "descender", font.metrics.descender as i64)?;
    put_i16(&mut out, "line height", font.metrics.height as i64)?;
    put_u16(&mut out, "charmap count", font.charmap.len() as i64)?;
    put_u16(&mut out, "glyph count", font.glyphs.len() as i64)?;
    put_u16(&mut out, "page count", font.textures.len() as i64)?;
    put_u16(&mut out, "page width", first.width() as i64)?;
    put_u16(&mut out, "page height", first.height() as i64)?;

    for (codepoint, glyph) in font.sorted_charmap() {
        out.extend_from_slice(&codepoint.to_be_bytes());
        put_u16(&mut out, "charmap glyph", glyph as i64)?;
    }

    for glyph in &font.glyphs {
        let (page, x, y) = match glyph.placement {
            Some(p) => (p.page as i64, p.pos.x as i64, p.pos.y as i64),
            None => (0, 0, 0),
        };
        put_u16(&mut out, "glyph width", glyph.size.width as i64)?;
        put_u16(&mut out, "glyph height", glyph.size.height as i64)?;
        put_i16(&mut out, "glyph center x", glyph.center.x as i64)?;
        put_i16(&mut out, "glyph center y", glyph.center.y as i64)?;
        put_i16(&mut out, "glyph advance", glyph.advance as i64)?;
        put_u16(&mut out, "glyph page", page)?;
        put_u16(&mut out, "glyph x", x)?;
        put_u16(&mut out, "glyph y", y)?;
    }

    for texture in &font.textures {
        out.extend_from_slice(&format.encode(texture)?);
    }

    tracing::debug!(
        "Serialized font asset: {} bytes, {} glyphs, {} pages",
        out.len(),
        font.glyphs.len(),
        font.textures.len()
    );
    Ok(out)
}

pub(crate) fn put_u16(out: &mut Vec<u8>, field: &'static str, value: i64) -> AssetResult<()> {
    let value = u16::try_from(value).map_err(|_| AssetError::FieldOverflow { field, value })?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

pub(crate) fn put_i16(out: &mut Vec<u8>, field: &'static str, value: i64) -> AssetResult<()> {
    let value = i16::try_from(value).map_err(|_| AssetError::FieldOverflow { field, value })?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Glyph, Metrics, Placement};
    use crate::format::PixelFormat;
    use glyphpack_core::geometry::{Pos, Size};
    use image::RgbaImage;

    const I8: SizedFormat = SizedFormat::new(PixelFormat::I, 8);

    fn packed_font() -> Font {
        let mut font = Font {
            metrics: Metrics {
                ascender: 10,
                descender: -2,
                height: 12,
            },
            ..Font::default()
        };
        font.glyphs.push(Glyph::empty(Size::new(0, 0), Pos::new(0, 0), 3, ".notdef"));
        let mut glyph = Glyph::from_coverage(Size::new(1, 1), Pos::new(-1, -7), 5, "A", &[0xff]);
        glyph.placement = Some(Placement {
            pos: Pos::new(1, 0),
            page: 0,
        });
        font.glyphs.push(glyph);
        font.charmap.insert(65, 1);
        font.textures.push(RgbaImage::new(2, 1));
        font
    }

    #[test]
    fn test_unpacked_font_is_rejected() {
        assert_eq!(write_asset(&Font::default(), I8), Err(AssetError::NotPacked));
    }

    #[test]
    fn test_layout() {
        let data = write_asset(&packed_font(), I8).unwrap();
        assert_eq!(&data[0..4], b"GPAK");
        assert_eq!(&data[4..6], &[0, 1]);
        assert_eq!(&data[6..8], &[4, 8]);
        // ascender, descender, height
        assert_eq!(&data[8..14], &[0, 10, 0xff, 0xfe, 0, 12]);
        // charmap count, glyph count, page count, page width, page height
        assert_eq!(&data[14..24], &[0, 1, 0, 2, 0, 1, 0, 2, 0, 1]);
        // charmap entry
        assert_eq!(&data[24..30], &[0, 0, 0, 65, 0, 1]);
        // glyph 1 record follows glyph 0's 16 bytes
        let g1 = &data[46..62];
        assert_eq!(g1, &[0, 1, 0, 1, 0xff, 0xff, 0xff, 0xf9, 0, 5, 0, 0, 0, 1, 0, 0]);
        // one 2x1 page at 8 bits per texel
        assert_eq!(data.len(), 62 + 2);
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut font = packed_font();
        font.glyphs[1].advance = 40000;
        assert_eq!(
            write_asset(&font, I8),
            Err(AssetError::FieldOverflow {
                field: "glyph advance",
                value: 40000
            })
        );
    }
}

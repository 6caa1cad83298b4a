//! Glyph stream protocol.
//!
//! The rasterizer writes one record per line, fields separated by single
//! spaces:
//!
//! ```text
//! metrics <ascender> <descender> <height>
//! char <codepoint> <glyph-index>
//! glyph <w> <h> <cx> <cy> <advance> <name> <hex-bitmap>
//! ```
//!
//! Glyph records carry no index; the n-th glyph record is glyph n. The hex
//! bitmap holds one grayscale byte per pixel and is ignored when either
//! dimension is zero. Any malformed record aborts the whole parse.

use std::fmt::Write as _;
use std::str::FromStr;

use glyphpack_core::geometry::{Pos, Size};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::font::{Font, Glyph, Metrics};

/// Largest glyph width or height accepted from the rasterizer.
pub const MAX_GLYPH_DIMENSION: u32 = 16 * 1024;

/// Parse a complete glyph stream into a font.
pub fn parse_stream(data: &[u8]) -> ParseResult<Font> {
    let mut font = Font::default();
    let mut rest = data;
    let mut line = 0;
    while !rest.is_empty() {
        line += 1;
        let record = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let record = &rest[..end];
                rest = &rest[end + 1..];
                record
            }
            None => std::mem::take(&mut rest),
        };
        parse_record(&mut font, record).map_err(|kind| ParseError { line, kind })?;
    }
    tracing::debug!(
        "Parsed glyph stream: {} lines, {} glyphs, {} charmap entries",
        line,
        font.glyphs.len(),
        font.charmap.len()
    );
    Ok(font)
}

fn parse_record(font: &mut Font, record: &[u8]) -> Result<(), ParseErrorKind> {
    let mut fields = record.split(|&b| b == b' ');
    let tag = fields.next().unwrap_or_default();
    let fields: Vec<&[u8]> = fields.collect();
    match tag {
        b"metrics" => {
            expect_fields("metrics", &fields, 3)?;
            font.metrics = Metrics {
                ascender: number("metrics", "ascender", fields[0])?,
                descender: number("metrics", "descender", fields[1])?,
                height: number("metrics", "height", fields[2])?,
            };
        }
        b"char" => {
            expect_fields("char", &fields, 2)?;
            let codepoint: u32 = number("char", "character", fields[0])?;
            let glyph: u32 = number("char", "glyph", fields[1])?;
            font.charmap.insert(codepoint, glyph);
        }
        b"glyph" => {
            expect_fields("glyph", &fields, 7)?;
            let glyph = parse_glyph(font.glyphs.len(), &fields)?;
            tracing::trace!("Glyph {} {:?}: {}", font.glyphs.len(), glyph.name, glyph.size);
            font.glyphs.push(glyph);
        }
        _ => {
            return Err(ParseErrorKind::UnknownRecord {
                tag: String::from_utf8_lossy(tag).into_owned(),
            });
        }
    }
    Ok(())
}

fn parse_glyph(index: usize, fields: &[&[u8]]) -> Result<Glyph, ParseErrorKind> {
    let width: i32 = number("glyph", "width", fields[0])?;
    let height: i32 = number("glyph", "height", fields[1])?;
    let center = Pos::new(
        number("glyph", "center x", fields[2])?,
        number("glyph", "center y", fields[3])?,
    );
    let advance: i32 = number("glyph", "advance", fields[4])?;
    let name = String::from_utf8_lossy(fields[5]).into_owned();

    if width < 0 || height < 0 {
        return Err(ParseErrorKind::NegativeSize {
            glyph: index,
            width,
            height,
        });
    }
    if width as u32 > MAX_GLYPH_DIMENSION || height as u32 > MAX_GLYPH_DIMENSION {
        return Err(ParseErrorKind::GlyphTooLarge {
            glyph: index,
            width,
            height,
            limit: MAX_GLYPH_DIMENSION,
        });
    }

    let size = Size::new(width as u32, height as u32);
    if size.is_empty() {
        return Ok(Glyph::empty(size, center, advance, name));
    }

    let data = fields[6];
    let expected = size.area() as usize * 2;
    if data.len() != expected {
        return Err(ParseErrorKind::BitmapLength {
            glyph: index,
            found: data.len(),
            expected,
        });
    }
    let coverage = decode_hex(data).map_err(|offset| ParseErrorKind::InvalidHex {
        glyph: index,
        offset,
    })?;
    Ok(Glyph::from_coverage(size, center, advance, name, &coverage))
}

fn expect_fields(record: &'static str, fields: &[&[u8]], expected: usize) -> Result<(), ParseErrorKind> {
    if fields.len() != expected {
        return Err(ParseErrorKind::FieldCount {
            record,
            found: fields.len(),
            expected,
        });
    }
    Ok(())
}

fn number<T: FromStr>(record: &'static str, field: &'static str, value: &[u8]) -> Result<T, ParseErrorKind> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseErrorKind::InvalidNumber {
            record,
            field,
            value: String::from_utf8_lossy(value).into_owned(),
        })
}

/// Decode pairs of hex digits, returning the offset of the first bad digit on failure.
fn decode_hex(data: &[u8]) -> Result<Vec<u8>, usize> {
    data.chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| -> Result<u8, usize> {
            let hi = hex_digit(pair[0]).ok_or(i * 2)?;
            let lo = hex_digit(pair[1]).ok_or(i * 2 + 1)?;
            Ok(hi << 4 | lo)
        })
        .collect()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Write a font back out as a glyph stream.
///
/// Charmap entries are written in code point order. Placements, textures
/// and any quantization are not represented; parsing the output of this
/// function for a freshly parsed font yields an equal font.
pub fn write_stream(font: &Font) -> Vec<u8> {
    let mut out = String::new();
    let m = font.metrics;
    let _ = writeln!(out, "metrics {} {} {}", m.ascender, m.descender, m.height);
    for (codepoint, glyph) in font.sorted_charmap() {
        let _ = writeln!(out, "char {} {}", codepoint, glyph);
    }
    for glyph in &font.glyphs {
        let _ = write!(
            out,
            "glyph {} {} {} {} {} {} ",
            glyph.size.width,
            glyph.size.height,
            glyph.center.x,
            glyph.center.y,
            glyph.advance,
            glyph.name
        );
        for value in glyph.coverage() {
            let _ = write!(out, "{:02x}", value);
        }
        out.push('\n');
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(data: &str) -> ParseError {
        parse_stream(data.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_empty_stream() {
        let font = parse_stream(b"").unwrap();
        assert!(font.glyphs.is_empty());
        assert!(font.charmap.is_empty());
    }

    #[test]
    fn test_last_metrics_and_char_win() {
        let font = parse_stream(b"metrics 1 2 3\nmetrics 4 -5 6\nchar 65 1\nchar 65 2\n").unwrap();
        assert_eq!(
            font.metrics,
            Metrics {
                ascender: 4,
                descender: -5,
                height: 6
            }
        );
        assert_eq!(font.charmap.get(&65), Some(&2));
    }

    #[test]
    fn test_zero_size_ignores_bitmap() {
        let font = parse_stream(b"glyph 3 0 0 0 4 space zz\n").unwrap();
        assert_eq!(font.glyphs.len(), 1);
        assert!(font.glyphs[0].bitmap.is_none());
        assert_eq!(font.glyphs[0].advance, 4);
    }

    #[test]
    fn test_final_line_without_newline() {
        let font = parse_stream(b"char 1 2").unwrap();
        assert_eq!(font.charmap.get(&1), Some(&2));
    }

    #[test]
    fn test_blank_line_is_rejected() {
        let err = parse_err("char 1 2\n\nchar 3 4\n");
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ParseErrorKind::UnknownRecord { .. }));
    }

    #[test]
    fn test_unknown_record() {
        let err = parse_err("metrics 1 2 3\nkern 1 2 3\n");
        assert_eq!(err.line, 2);
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownRecord {
                tag: "kern".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_err("glyph 1 1 0 0 1 A\n");
        assert_eq!(
            err.kind,
            ParseErrorKind::FieldCount {
                record: "glyph",
                found: 6,
                expected: 7
            }
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_err("char x 1\n");
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidNumber {
                record: "char",
                field: "character",
                ..
            }
        ));
        let err = parse_err("char -1 1\n");
        assert!(matches!(err.kind, ParseErrorKind::InvalidNumber { .. }));
    }

    #[test]
    fn test_oversized_glyph() {
        let err = parse_err("glyph 0 0 0 0 0 a \nglyph 16385 1 0 0 0 big 00\n");
        assert_eq!(err.line, 2);
        assert!(matches!(
            err.kind,
            ParseErrorKind::GlyphTooLarge { glyph: 1, width: 16385, .. }
        ));
    }

    #[test]
    fn test_oversized_zero_area_glyph() {
        let err = parse_err("glyph 20000 0 0 0 0 wide \n");
        assert!(matches!(err.kind, ParseErrorKind::GlyphTooLarge { .. }));
    }

    #[test]
    fn test_negative_size() {
        let err = parse_err("glyph -1 2 0 0 0 neg \n");
        assert!(matches!(err.kind, ParseErrorKind::NegativeSize { .. }));
    }

    #[test]
    fn test_bitmap_length_mismatch() {
        let err = parse_err("glyph 2 2 0 0 0 A ffffff\n");
        assert_eq!(
            err.kind,
            ParseErrorKind::BitmapLength {
                glyph: 0,
                found: 6,
                expected: 8
            }
        );
    }

    #[test]
    fn test_invalid_hex() {
        let err = parse_err("glyph 2 1 0 0 0 A ffgf\n");
        assert_eq!(err.kind, ParseErrorKind::InvalidHex { glyph: 0, offset: 2 });
    }

    #[test]
    fn test_uppercase_hex() {
        let font = parse_stream(b"glyph 2 1 0 0 0 A 0AfF\n").unwrap();
        assert_eq!(font.glyphs[0].coverage(), vec![0x0a, 0xff]);
    }
}

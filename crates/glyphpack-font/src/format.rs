//! Sized texture formats and glyph quantization.
//!
//! Formats are written `FORMAT.SIZE`, for example `i.4` or `rgba.16`.
//! Quantization snaps each glyph bitmap to the precision of the format and
//! stores the result back in the bitmap, so previews and the packed atlas
//! show exactly what the runtime will see.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};

use crate::error::{FormatError, FormatResult};
use crate::font::{Font, coverage_of, luma};

/// Texel layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Red, green, blue, alpha.
    Rgba,
    /// Intensity with alpha.
    Ia,
    /// Intensity only.
    I,
    /// Color-indexed.
    Ci,
}

impl PixelFormat {
    fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba => "rgba",
            PixelFormat::Ia => "ia",
            PixelFormat::I => "i",
            PixelFormat::Ci => "ci",
        }
    }
}

/// A pixel format together with its bits per texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizedFormat {
    pub format: PixelFormat,
    pub bits: u8,
}

/// How many bits each channel keeps, for the formats that can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Intensity { i: u8 },
    IntensityAlpha { i: u8, a: u8 },
    Color { c: u8, a: u8 },
}

impl SizedFormat {
    pub const fn new(format: PixelFormat, bits: u8) -> Self {
        Self { format, bits }
    }

    /// Numeric code stored in serialized assets.
    pub fn code(&self) -> u8 {
        match self.format {
            PixelFormat::Rgba => 0,
            PixelFormat::Ia => 3,
            PixelFormat::I => 4,
            PixelFormat::Ci => 2,
        }
    }

    fn layout(&self) -> FormatResult<Layout> {
        let layout = match (self.format, self.bits) {
            (PixelFormat::I, 4) => Layout::Intensity { i: 4 },
            (PixelFormat::I, 8) => Layout::Intensity { i: 8 },
            (PixelFormat::Ia, 4) => Layout::IntensityAlpha { i: 3, a: 1 },
            (PixelFormat::Ia, 8) => Layout::IntensityAlpha { i: 4, a: 4 },
            (PixelFormat::Ia, 16) => Layout::IntensityAlpha { i: 8, a: 8 },
            (PixelFormat::Rgba, 16) => Layout::Color { c: 5, a: 1 },
            (PixelFormat::Rgba, 32) => Layout::Color { c: 8, a: 8 },
            _ => {
                return Err(FormatError::Unsupported {
                    format: self.to_string(),
                });
            }
        };
        Ok(layout)
    }

    /// Check that glyphs can be quantized to and encoded in this format.
    pub fn validate(&self) -> FormatResult<()> {
        self.layout().map(|_| ())
    }

    /// Encode an image as packed texels, row-major, each row padded to a byte.
    ///
    /// Multi-bit texels are big-endian; 4-bit texels put the left pixel in
    /// the high nibble.
    pub fn encode(&self, im: &RgbaImage) -> FormatResult<Vec<u8>> {
        let layout = self.layout()?;
        let mut writer = BitWriter::default();
        for row in im.rows() {
            for px in row {
                let texel = match layout {
                    Layout::Intensity { i } => quantize(coverage_of(*px), i),
                    Layout::IntensityAlpha { i, a } => {
                        quantize(luma(*px), i) << a | quantize(px.0[3], a)
                    }
                    Layout::Color { c, a } => {
                        let [r, g, b, alpha] = px.0;
                        (quantize(r, c) << (c * 2 + a))
                            | (quantize(g, c) << (c + a))
                            | (quantize(b, c) << a)
                            | quantize(alpha, a)
                    }
                };
                writer.push(texel, self.bits);
            }
            writer.align();
        }
        Ok(writer.finish())
    }
}

impl FromStr for SizedFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> FormatResult<Self> {
        let malformed = || FormatError::Malformed {
            value: s.to_string(),
        };
        let (name, bits) = s.split_once('.').ok_or_else(malformed)?;
        let format = match name.to_ascii_lowercase().as_str() {
            "rgba" => PixelFormat::Rgba,
            "ia" => PixelFormat::Ia,
            "i" => PixelFormat::I,
            "ci" => PixelFormat::Ci,
            _ => {
                return Err(FormatError::UnknownFormat {
                    name: name.to_string(),
                });
            }
        };
        let bits = match bits {
            "4" => 4,
            "8" => 8,
            "16" => 16,
            "32" => 32,
            _ => return Err(malformed()),
        };
        Ok(Self { format, bits })
    }
}

impl fmt::Display for SizedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.format.name(), self.bits)
    }
}

/// Dithering applied while quantizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dither {
    #[default]
    None,
    /// 4x4 ordered (Bayer) dithering.
    Ordered,
}

const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Quantize every visible glyph bitmap in place.
///
/// Glyphs without area are skipped.
pub fn quantize_font(font: &mut Font, format: SizedFormat, dither: Dither) -> FormatResult<()> {
    let layout = format.layout()?;
    for glyph in font.glyphs.iter_mut().filter(|g| !g.is_empty()) {
        if let Some(bitmap) = &mut glyph.bitmap {
            quantize_image(bitmap, layout, dither);
        }
    }
    tracing::debug!("Quantized {} glyphs to {}", font.visible_glyph_count(), format);
    Ok(())
}

/// Threshold every visible glyph's coverage to fully on or fully off.
///
/// Pixels with at least half coverage become opaque; the rest transparent.
pub fn make_monochrome(font: &mut Font) {
    for bitmap in font.glyphs.iter_mut().filter_map(|g| g.bitmap.as_mut()) {
        for px in bitmap.pixels_mut() {
            let on = coverage_of(*px) >= 0x80;
            *px = Rgba([0xff, 0xff, 0xff, if on { 0xff } else { 0 }]);
        }
    }
}

fn quantize_image(im: &mut RgbaImage, layout: Layout, dither: Dither) {
    for (x, y, px) in im.enumerate_pixels_mut() {
        let threshold = match dither {
            Dither::None => None,
            Dither::Ordered => Some(BAYER_4X4[(y % 4) as usize][(x % 4) as usize]),
        };
        let snap = |value: u8, bits: u8| expand(quantize(dithered(value, bits, threshold), bits), bits);
        *px = match layout {
            Layout::Intensity { i } => {
                let v = snap(coverage_of(*px), i);
                Rgba([v, v, v, 0xff])
            }
            Layout::IntensityAlpha { i, a } => {
                let v = snap(luma(*px), i);
                Rgba([v, v, v, snap(px.0[3], a)])
            }
            Layout::Color { c, a } => {
                let [r, g, b, alpha] = px.0;
                Rgba([snap(r, c), snap(g, c), snap(b, c), snap(alpha, a)])
            }
        };
    }
}

/// Offset `value` by the Bayer threshold, scaled to one quantization step.
fn dithered(value: u8, bits: u8, threshold: Option<u8>) -> u8 {
    let Some(t) = threshold else {
        return value;
    };
    if bits >= 8 {
        return value;
    }
    let max = (1i32 << bits) - 1;
    let offset = (2 * t as i32 - 15) * 255 / (32 * max);
    (value as i32 + offset).clamp(0, 255) as u8
}

/// Reduce an 8-bit value to `bits` bits, rounding to nearest.
fn quantize(value: u8, bits: u8) -> u32 {
    let max = (1u32 << bits) - 1;
    (value as u32 * max + 127) / 255
}

/// Expand a `bits`-bit value back to 8 bits.
fn expand(value: u32, bits: u8) -> u8 {
    let max = (1u32 << bits) - 1;
    (value * 255 / max) as u8
}

/// MSB-first bit packer.
#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    len: u32,
}

impl BitWriter {
    fn push(&mut self, value: u32, bits: u8) {
        self.acc = (self.acc << bits) | value as u64;
        self.len += bits as u32;
        while self.len >= 8 {
            self.len -= 8;
            self.out.push((self.acc >> self.len) as u8);
        }
        self.acc &= (1u64 << self.len) - 1;
    }

    fn align(&mut self) {
        if self.len > 0 {
            let pad = 8 - self.len as u8;
            self.push(0, pad);
        }
    }

    fn finish(mut self) -> Vec<u8> {
        self.align();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Glyph;
    use glyphpack_core::geometry::{Pos, Size};

    #[test]
    fn test_make_monochrome_thresholds_at_half() {
        let mut font = Font::default();
        font.glyphs.push(Glyph::from_coverage(
            Size::new(4, 1),
            Pos::new(0, 0),
            4,
            "g",
            &[0x00, 0x7f, 0x80, 0xff],
        ));
        make_monochrome(&mut font);
        assert_eq!(font.glyphs[0].coverage(), vec![0x00, 0x00, 0xff, 0xff]);
    }

    #[test]
    fn test_parse_and_display() {
        let format: SizedFormat = "ia.8".parse().unwrap();
        assert_eq!(format, SizedFormat::new(PixelFormat::Ia, 8));
        assert_eq!(format.to_string(), "ia.8");
        assert_eq!("RGBA.16".parse::<SizedFormat>().unwrap().to_string(), "rgba.16");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("i4".parse::<SizedFormat>(), Err(FormatError::Malformed { .. })));
        assert!(matches!("i.5".parse::<SizedFormat>(), Err(FormatError::Malformed { .. })));
        assert!(matches!("yuv.16".parse::<SizedFormat>(), Err(FormatError::UnknownFormat { .. })));
    }

    #[test]
    fn test_unsupported_combinations() {
        for s in ["ci.4", "ci.8", "i.16", "rgba.8", "ia.32"] {
            let format: SizedFormat = s.parse().unwrap();
            assert!(
                matches!(format.validate(), Err(FormatError::Unsupported { .. })),
                "{} should be unsupported",
                s
            );
        }
    }

    #[test]
    fn test_quantize_roundtrip_extremes() {
        for bits in [1, 3, 4, 5, 8] {
            assert_eq!(expand(quantize(0, bits), bits), 0);
            assert_eq!(expand(quantize(255, bits), bits), 255);
        }
        assert_eq!(quantize(0x88, 4), 8);
        assert_eq!(expand(8, 4), 0x88);
    }

    #[test]
    fn test_i4_snaps_coverage() {
        let mut im = RgbaImage::from_pixel(1, 1, Rgba([0xff, 0xff, 0xff, 0x80]));
        quantize_image(&mut im, Layout::Intensity { i: 4 }, Dither::None);
        assert_eq!(*im.get_pixel(0, 0), Rgba([0x88, 0x88, 0x88, 0xff]));
    }

    #[test]
    fn test_ia4_alpha_is_one_bit() {
        let mut im = RgbaImage::from_pixel(1, 1, Rgba([0xff, 0xff, 0xff, 0x90]));
        quantize_image(&mut im, Layout::IntensityAlpha { i: 3, a: 1 }, Dither::None);
        assert_eq!(*im.get_pixel(0, 0), Rgba([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_encode_i4_packs_nibbles() {
        let mut im = RgbaImage::new(3, 2);
        im.put_pixel(0, 0, Rgba([0xff, 0xff, 0xff, 0xff]));
        im.put_pixel(2, 1, Rgba([0xff, 0xff, 0xff, 0x11]));
        let data = SizedFormat::new(PixelFormat::I, 4).encode(&im).unwrap();
        // Two rows of three nibbles, each padded to two bytes.
        assert_eq!(data, vec![0xf0, 0x00, 0x00, 0x10]);
    }

    #[test]
    fn test_encode_rgba16() {
        let im = RgbaImage::from_pixel(1, 1, Rgba([0xff, 0x00, 0xff, 0xff]));
        let data = SizedFormat::new(PixelFormat::Rgba, 16).encode(&im).unwrap();
        assert_eq!(data, vec![0xf8, 0x3f]);
    }

    #[test]
    fn test_ordered_dither_stays_in_range() {
        let mut im = RgbaImage::from_fn(4, 4, |x, y| Rgba([0xff, 0xff, 0xff, (x * 60 + y * 3) as u8]));
        quantize_image(&mut im, Layout::Intensity { i: 4 }, Dither::Ordered);
        for px in im.pixels() {
            assert_eq!(px.0[0] % 0x11, 0);
        }
    }
}

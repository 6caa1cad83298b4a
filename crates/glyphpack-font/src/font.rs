//! Bitmap font data model.
//!
//! A [`Font`] owns an ordered list of [`Glyph`]s. A glyph's position in that
//! list is its glyph index: the charmap and the serialized asset refer to
//! glyphs by position only, so any pass that reorders or drops glyphs must
//! rewrite every charmap value in the same step.

use glyphpack_core::alloc::HashMap;
use glyphpack_core::geometry::{Pos, Size};
use image::{Rgba, RgbaImage};

/// Index of the fallback (".notdef") glyph.
pub const FALLBACK_GLYPH: u32 = 0;

/// Font-wide vertical metrics, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub ascender: i32,
    pub descender: i32,
    pub height: i32,
}

/// Where a glyph was placed by the atlas packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Top-left corner within its page.
    pub pos: Pos<u32>,
    /// Index of the page in [`Font::textures`].
    pub page: usize,
}

/// One renderable glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Bitmap size. A zero dimension means the glyph draws nothing.
    pub size: Size<u32>,
    /// Offset of the bitmap origin from the pen position.
    pub center: Pos<i32>,
    /// Horizontal pen advance.
    pub advance: i32,
    /// Glyph name from the rasterizer, for debugging.
    pub name: String,
    /// Bitmap, present only when the glyph has area.
    ///
    /// Coverage is stored as white with straight alpha until the glyph is
    /// quantized to a texture format.
    pub bitmap: Option<RgbaImage>,
    /// Assigned by [`crate::pack_font`].
    pub placement: Option<Placement>,
}

impl Glyph {
    /// Create a glyph with no bitmap.
    pub fn empty(size: Size<u32>, center: Pos<i32>, advance: i32, name: impl Into<String>) -> Self {
        Self {
            size,
            center,
            advance,
            name: name.into(),
            bitmap: None,
            placement: None,
        }
    }

    /// Create a glyph from one 8-bit coverage value per pixel, row-major.
    ///
    /// When the size has no area the coverage is ignored.
    ///
    /// # Panics
    ///
    /// Panics if the size has area and `coverage` does not hold exactly
    /// `width * height` bytes.
    pub fn from_coverage(
        size: Size<u32>,
        center: Pos<i32>,
        advance: i32,
        name: impl Into<String>,
        coverage: &[u8],
    ) -> Self {
        let mut glyph = Self::empty(size, center, advance, name);
        if !size.is_empty() {
            assert_eq!(
                coverage.len() as u64,
                size.area(),
                "coverage length does not match glyph size {}",
                size
            );
            glyph.bitmap = Some(RgbaImage::from_fn(size.width, size.height, |x, y| {
                let value = coverage[(y * size.width + x) as usize];
                Rgba([0xff, 0xff, 0xff, value])
            }));
        }
        glyph
    }

    /// True if the glyph draws nothing and must not be packed or quantized.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Row-major 8-bit coverage of the bitmap, empty when the glyph has no area.
    pub fn coverage(&self) -> Vec<u8> {
        match &self.bitmap {
            Some(bitmap) => bitmap.pixels().map(|px| coverage_of(*px)).collect(),
            None => Vec::new(),
        }
    }
}

/// Luminance of a pixel, ignoring alpha.
pub(crate) fn luma(px: Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Luminance premultiplied by alpha: how much light the pixel adds over black.
pub(crate) fn coverage_of(px: Rgba<u8>) -> u8 {
    ((luma(px) as u32 * px.0[3] as u32 + 127) / 255) as u8
}

/// A bitmap font, from rasterizer output to packed atlas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    pub metrics: Metrics,
    /// Unicode code point to glyph index.
    pub charmap: HashMap<u32, u32>,
    /// Glyphs, addressed by position. Index 0 is the fallback glyph.
    pub glyphs: Vec<Glyph>,
    /// Packed atlas pages, filled in by [`crate::pack_font`].
    pub textures: Vec<RgbaImage>,
}

impl Font {
    /// Glyph index for a code point.
    ///
    /// Unmapped code points and out-of-range charmap values resolve to the
    /// fallback glyph.
    pub fn glyph_index(&self, codepoint: u32) -> u32 {
        match self.charmap.get(&codepoint) {
            Some(&index) if (index as usize) < self.glyphs.len() => index,
            _ => FALLBACK_GLYPH,
        }
    }

    /// Glyph drawn for a code point, or `None` if the font has no glyphs.
    pub fn glyph_for(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.get(self.glyph_index(codepoint) as usize)
    }

    /// Number of glyphs that have a bitmap to pack.
    pub fn visible_glyph_count(&self) -> usize {
        self.glyphs.iter().filter(|g| !g.is_empty()).count()
    }

    /// Charmap entries sorted by code point.
    pub fn sorted_charmap(&self) -> Vec<(u32, u32)> {
        let mut entries: Vec<(u32, u32)> = self.charmap.iter().map(|(&c, &g)| (c, g)).collect();
        entries.sort_unstable();
        entries
    }

    /// True once [`crate::pack_font`] has produced atlas pages.
    pub fn is_packed(&self) -> bool {
        !self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "coverage length")]
    fn test_from_coverage_rejects_short_data() {
        Glyph::from_coverage(Size::new(2, 2), Pos::new(0, 0), 0, "g", &[0xff; 3]);
    }

    #[test]
    #[should_panic(expected = "coverage length")]
    fn test_from_coverage_rejects_long_data() {
        Glyph::from_coverage(Size::new(2, 2), Pos::new(0, 0), 0, "g", &[0xff; 5]);
    }

    #[test]
    fn test_from_coverage_ignores_data_without_area() {
        let glyph = Glyph::from_coverage(Size::new(0, 3), Pos::new(0, 0), 4, "space", &[1, 2]);
        assert!(glyph.bitmap.is_none());
    }

    fn two_glyph_font() -> Font {
        let mut font = Font::default();
        font.glyphs.push(Glyph::empty(Size::new(0, 0), Pos::new(0, 0), 0, ".notdef"));
        font.glyphs.push(Glyph::from_coverage(
            Size::new(2, 1),
            Pos::new(0, 0),
            3,
            "A",
            &[0x10, 0xff],
        ));
        font.charmap.insert(65, 1);
        font.charmap.insert(66, 9);
        font
    }

    #[test]
    fn test_glyph_index_falls_back() {
        let font = two_glyph_font();
        assert_eq!(font.glyph_index(65), 1);
        assert_eq!(font.glyph_index(66), FALLBACK_GLYPH);
        assert_eq!(font.glyph_index(67), FALLBACK_GLYPH);
        assert_eq!(font.glyph_for(67).unwrap().name, ".notdef");
    }

    #[test]
    fn test_coverage_roundtrip() {
        let font = two_glyph_font();
        assert_eq!(font.glyphs[1].coverage(), vec![0x10, 0xff]);
        assert!(font.glyphs[0].coverage().is_empty());
        assert_eq!(font.visible_glyph_count(), 1);
    }

    #[test]
    fn test_coverage_of_opaque_gray() {
        assert_eq!(coverage_of(Rgba([0x40, 0x40, 0x40, 0xff])), 0x40);
        assert_eq!(coverage_of(Rgba([0xff, 0xff, 0xff, 0x00])), 0);
    }
}

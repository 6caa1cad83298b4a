//! Atlas building: glyph placement and page images.

use glyphpack_atlas::{PackError, PackResult, PackingOracle};
use glyphpack_core::geometry::{Pos, Rect, Size};
use image::{RgbaImage, imageops};

use crate::font::{Font, Placement};

/// Pack every visible glyph of `font` into an atlas.
///
/// With no `page_size` all glyphs go into one region sized by the oracle.
/// With a page size the oracle spreads glyphs over fixed-size pages, which
/// are stacked vertically in the returned image: page `k` starts at
/// `y = k * page_height`.
///
/// Each visible glyph gets a [`Placement`] relative to its own page, and
/// `font.textures` receives one image per page. Glyphs without area are not
/// submitted to the oracle and get no placement.
///
/// Fails with [`PackError::EmptyTexture`] if the font has nothing to draw,
/// and with [`PackError::RegionTooLarge`] if the combined image would not fit
/// in memory.
pub fn pack_font<O: PackingOracle + ?Sized>(
    font: &mut Font,
    page_size: Option<Size<u32>>,
    oracle: &O,
) -> PackResult<RgbaImage> {
    font.textures.clear();
    for glyph in &mut font.glyphs {
        glyph.placement = None;
    }

    let visible: Vec<usize> = (0..font.glyphs.len())
        .filter(|&i| !font.glyphs[i].is_empty())
        .collect();
    let sizes: Vec<Size<u32>> = visible.iter().map(|&i| font.glyphs[i].size).collect();

    // Per visible glyph: placement in its page, and position in the combined image.
    let mut placed: Vec<(Placement, Pos<u32>)> = Vec::with_capacity(sizes.len());
    let bounds = match page_size {
        None => {
            let result = oracle.pack_single(&sizes)?;
            if result.bounds.is_empty() {
                return Err(PackError::EmptyTexture);
            }
            check_count(sizes.len(), result.positions.len())?;
            for (index, (&pos, &size)) in result.positions.iter().zip(&sizes).enumerate() {
                if !Rect::new(pos, size).fits_within(result.bounds) {
                    return Err(PackError::PlacementOutOfBounds { index });
                }
                placed.push((Placement { pos, page: 0 }, pos));
            }
            result.bounds
        }
        Some(page) => {
            let result = oracle.pack_multiple(page, &sizes)?;
            if result.page_count == 0 {
                return Err(PackError::EmptyTexture);
            }
            check_count(sizes.len(), result.placements.len())?;
            let height = u32::try_from(result.page_count)
                .ok()
                .and_then(|count| page.height.checked_mul(count))
                .ok_or(PackError::RegionTooLarge { limit: u32::MAX })?;
            for (index, (p, &size)) in result.placements.iter().zip(&sizes).enumerate() {
                if p.page >= result.page_count || !Rect::new(p.pos, size).fits_within(page) {
                    return Err(PackError::PlacementOutOfBounds { index });
                }
                let combined = Pos::new(p.pos.x, p.pos.y + page.height * p.page as u32);
                placed.push((
                    Placement {
                        pos: p.pos,
                        page: p.page,
                    },
                    combined,
                ));
            }
            Size::new(page.width, height)
        }
    };

    // RGBA8 buffer length must be addressable before allocating.
    (bounds.width as usize)
        .checked_mul(bounds.height as usize)
        .and_then(|texels| texels.checked_mul(4))
        .ok_or(PackError::RegionTooLarge { limit: u32::MAX })?;
    let mut im = RgbaImage::new(bounds.width, bounds.height);
    for (&glyph_index, &(placement, combined)) in visible.iter().zip(&placed) {
        let glyph = &mut font.glyphs[glyph_index];
        if let Some(bitmap) = &glyph.bitmap {
            imageops::replace(&mut im, bitmap, combined.x as i64, combined.y as i64);
        }
        glyph.placement = Some(placement);
    }

    font.textures = match page_size {
        Some(page) => {
            let count = bounds.height / page.height;
            (0..count)
                .map(|k| imageops::crop_imm(&im, 0, k * page.height, page.width, page.height).to_image())
                .collect()
        }
        None => vec![im.clone()],
    };

    tracing::debug!(
        "Packed {} glyphs into {} page(s), combined image {}",
        visible.len(),
        font.textures.len(),
        bounds
    );
    Ok(im)
}

fn check_count(expected: usize, found: usize) -> PackResult<()> {
    if expected != found {
        return Err(PackError::PlacementCount { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Glyph;
    use glyphpack_atlas::{MultiPack, PagePlacement, SinglePack};

    /// Oracle that returns a fixed answer regardless of input.
    struct Scripted {
        single: SinglePack,
        multi: MultiPack,
    }

    impl PackingOracle for Scripted {
        fn pack_single(&self, _sizes: &[Size<u32>]) -> PackResult<SinglePack> {
            Ok(self.single.clone())
        }

        fn pack_multiple(&self, _page: Size<u32>, _sizes: &[Size<u32>]) -> PackResult<MultiPack> {
            Ok(self.multi.clone())
        }
    }

    fn one_glyph_font() -> Font {
        let mut font = Font::default();
        font.glyphs.push(Glyph::from_coverage(
            Size::new(2, 2),
            Pos::new(0, 0),
            0,
            "g",
            &[0xff; 4],
        ));
        font
    }

    #[test]
    fn test_out_of_bounds_placement_is_rejected() {
        let oracle = Scripted {
            single: SinglePack {
                bounds: Size::new(2, 2),
                positions: vec![Pos::new(1, 0)],
            },
            multi: MultiPack {
                page_count: 0,
                placements: Vec::new(),
            },
        };
        let err = pack_font(&mut one_glyph_font(), None, &oracle).unwrap_err();
        assert_eq!(err, PackError::PlacementOutOfBounds { index: 0 });
    }

    #[test]
    fn test_missing_placements_are_rejected() {
        let oracle = Scripted {
            single: SinglePack {
                bounds: Size::new(2, 2),
                positions: Vec::new(),
            },
            multi: MultiPack {
                page_count: 1,
                placements: vec![
                    PagePlacement {
                        page: 0,
                        pos: Pos::new(0, 0),
                    };
                    2
                ],
            },
        };
        let err = pack_font(&mut one_glyph_font(), None, &oracle).unwrap_err();
        assert_eq!(
            err,
            PackError::PlacementCount {
                expected: 1,
                found: 0
            }
        );
        let err = pack_font(&mut one_glyph_font(), Some(Size::new(4, 4)), &oracle).unwrap_err();
        assert_eq!(
            err,
            PackError::PlacementCount {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_page_index_beyond_count_is_rejected() {
        let oracle = Scripted {
            single: SinglePack {
                bounds: Size::new(0, 0),
                positions: Vec::new(),
            },
            multi: MultiPack {
                page_count: 1,
                placements: vec![PagePlacement {
                    page: 1,
                    pos: Pos::new(0, 0),
                }],
            },
        };
        let err = pack_font(&mut one_glyph_font(), Some(Size::new(4, 4)), &oracle).unwrap_err();
        assert_eq!(err, PackError::PlacementOutOfBounds { index: 0 });
    }

    #[test]
    fn test_unaddressable_page_size_is_rejected() {
        let mut font = one_glyph_font();
        let err = pack_font(
            &mut font,
            Some(Size::new(u32::MAX, u32::MAX)),
            &glyphpack_atlas::TreePacker::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PackError::RegionTooLarge { .. }));
        assert!(font.textures.is_empty());
    }
}

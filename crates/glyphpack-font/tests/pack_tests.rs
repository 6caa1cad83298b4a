//! End-to-end packing through the default tree packer.

use glyphpack_atlas::TreePacker;
use glyphpack_core::alloc::HashSet;
use glyphpack_core::geometry::{Pos, Rect, Size};
use glyphpack_font::{FallbackPolicy, Font, Glyph, PackError, pack_font, parse_stream, subset};
use image::Rgba;

/// Font with glyphs of assorted sizes, each filled with a distinct coverage.
fn assorted_font(count: u32) -> Font {
    let mut font = Font::default();
    font.glyphs
        .push(Glyph::empty(Size::new(0, 0), Pos::new(0, 0), 0, ".notdef"));
    for i in 1..count {
        let size = Size::new(1 + i % 9, 2 + (i * 5) % 11);
        let coverage = vec![(i % 255) as u8 + 1; (size.width * size.height) as usize];
        font.glyphs.push(Glyph::from_coverage(
            size,
            Pos::new(0, 0),
            size.width as i32,
            format!("g{}", i),
            &coverage,
        ));
        font.charmap.insert(0x20 + i, i);
    }
    font
}

/// Rectangles of all placed glyphs on a given page.
fn page_rects(font: &Font, page: usize) -> Vec<Rect<u32>> {
    font.glyphs
        .iter()
        .filter_map(|g| g.placement.map(|p| (p, g.size)))
        .filter(|(p, _)| p.page == page)
        .map(|(p, size)| Rect::new(p.pos, size))
        .collect()
}

fn assert_disjoint(rects: &[Rect<u32>]) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
        }
    }
}

// ============================================================================
// Single Region
// ============================================================================

#[test]
fn test_scenario_single_glyph() {
    let parsed = parse_stream(
        b"metrics 10 -2 12\nchar 65 1\nglyph 0 0 0 0 0 .notdef \nglyph 4 4 0 0 5 A ffffffffffffffffffffffffffffffff\n",
    )
    .unwrap();
    let required: HashSet<u32> = [65].into_iter().collect();
    let mut font = subset(&parsed, &required, FallbackPolicy::Keep);
    assert_eq!(font.glyphs.len(), 2);
    assert_eq!(font.charmap.get(&65), Some(&1));

    let im = pack_font(&mut font, None, &TreePacker::default()).unwrap();

    assert!(im.width() >= 4 && im.height() >= 4);
    assert_eq!(font.glyphs[0].placement, None);
    let placement = font.glyphs[1].placement.unwrap();
    assert_eq!(placement.page, 0);
    assert_eq!(font.textures.len(), 1);
    assert_eq!(font.textures[0], im);

    let p = placement.pos;
    for y in p.y..p.y + 4 {
        for x in p.x..p.x + 4 {
            assert_eq!(*im.get_pixel(x, y), Rgba([0xff, 0xff, 0xff, 0xff]));
        }
    }
}

#[test]
fn test_single_region_places_every_glyph() {
    let mut font = assorted_font(60);
    let im = pack_font(&mut font, None, &TreePacker::default()).unwrap();
    let bounds = Size::new(im.width(), im.height());

    let rects = page_rects(&font, 0);
    assert_eq!(rects.len(), 59);
    assert_disjoint(&rects);
    for rect in &rects {
        assert!(rect.fits_within(bounds));
    }

    // Every glyph's bitmap is reproduced at its placement.
    for glyph in font.glyphs.iter().filter(|g| !g.is_empty()) {
        let pos = glyph.placement.unwrap().pos;
        let bitmap = glyph.bitmap.as_ref().unwrap();
        for (x, y, px) in bitmap.enumerate_pixels() {
            assert_eq!(im.get_pixel(pos.x + x, pos.y + y), px);
        }
    }
}

#[test]
fn test_empty_font_is_rejected() {
    let mut font = parse_stream(b"glyph 0 0 0 0 0 .notdef \nglyph 0 0 0 0 3 space \n").unwrap();
    let err = pack_font(&mut font, None, &TreePacker::default()).unwrap_err();
    assert_eq!(err, PackError::EmptyTexture);

    let err = pack_font(&mut font, Some(Size::new(16, 16)), &TreePacker::default()).unwrap_err();
    assert_eq!(err, PackError::EmptyTexture);
}

// ============================================================================
// Multiple Pages
// ============================================================================

#[test]
fn test_multi_page_slices_combined_image() {
    let mut font = assorted_font(80);
    let page = Size::new(32, 32);
    let im = pack_font(&mut font, Some(page), &TreePacker::default()).unwrap();

    let pages = font.textures.len();
    assert!(pages > 1);
    assert_eq!(im.width(), 32);
    assert_eq!(im.height(), 32 * pages as u32);

    for (k, texture) in font.textures.iter().enumerate() {
        assert_eq!(texture.dimensions(), (32, 32));
        let rects = page_rects(&font, k);
        assert_disjoint(&rects);
        for rect in &rects {
            assert!(rect.fits_within(page));
        }
        // Each page matches its band of the combined image.
        for (x, y, px) in texture.enumerate_pixels() {
            assert_eq!(im.get_pixel(x, y + 32 * k as u32), px);
        }
    }

    // Placements are page-relative, so sampling a page texture finds the glyph.
    for glyph in font.glyphs.iter().filter(|g| !g.is_empty()) {
        let placement = glyph.placement.unwrap();
        let bitmap = glyph.bitmap.as_ref().unwrap();
        let texture = &font.textures[placement.page];
        assert_eq!(
            texture.get_pixel(placement.pos.x, placement.pos.y),
            bitmap.get_pixel(0, 0)
        );
    }
}

#[test]
fn test_glyph_larger_than_page_is_rejected() {
    let mut font = assorted_font(10);
    let err = pack_font(&mut font, Some(Size::new(4, 4)), &TreePacker::default()).unwrap_err();
    assert!(matches!(err, PackError::RectTooLarge { .. }));
}

#[test]
fn test_repacking_replaces_previous_result() {
    let mut font = assorted_font(20);
    pack_font(&mut font, Some(Size::new(16, 16)), &TreePacker::default()).unwrap();
    let im = pack_font(&mut font, None, &TreePacker::default()).unwrap();
    assert_eq!(font.textures.len(), 1);
    assert_eq!(font.textures[0], im);
    assert!(font.glyphs.iter().flat_map(|g| g.placement).all(|p| p.page == 0));
}

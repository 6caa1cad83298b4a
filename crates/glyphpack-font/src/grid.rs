//! Debug grid preview of every glyph in a font.

use image::{Rgba, RgbaImage, imageops};

use crate::font::Font;

const COLUMNS: usize = 16;
const BORDER: u32 = 1;
const MARGIN: u32 = 2;
const SPACE: u32 = BORDER + MARGIN * 2;
const BORDER_COLOR: Rgba<u8> = Rgba([0x80, 0x80, 0x80, 0xff]);
const BACKGROUND: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);

/// Lay out every glyph, in index order, in an outlined 16-column grid.
///
/// Cells are sized to the largest glyph plus border and margin. Glyphs with
/// no bitmap leave their cell empty. The result is for inspection only.
pub fn render_grid(font: &Font) -> RgbaImage {
    let count = font.glyphs.len();
    let cols = COLUMNS.min(count);
    let rows = if cols == 0 { 0 } else { count.div_ceil(cols) };

    let cell_width = font.glyphs.iter().map(|g| g.size.width).max().unwrap_or(0) + SPACE;
    let cell_height = font.glyphs.iter().map(|g| g.size.height).max().unwrap_or(0) + SPACE;

    let mut im = RgbaImage::from_pixel(
        cols as u32 * cell_width + BORDER,
        rows as u32 * cell_height + BORDER,
        BACKGROUND,
    );

    for (i, glyph) in font.glyphs.iter().enumerate() {
        let px = cell_width * (i % cols) as u32;
        let py = cell_height * (i / cols) as u32;
        draw_box(
            &mut im,
            px,
            py,
            px + cell_width + BORDER,
            py + cell_height + BORDER,
        );
        if let Some(bitmap) = &glyph.bitmap {
            imageops::overlay(
                &mut im,
                bitmap,
                (px + BORDER + MARGIN) as i64,
                (py + BORDER + MARGIN) as i64,
            );
        }
    }

    tracing::debug!(
        "Rendered grid of {} glyphs: {}x{} cells of {}x{}",
        count,
        cols,
        rows,
        cell_width,
        cell_height
    );
    im
}

/// Outline the box `[x0, x1) x [y0, y1)` with a `BORDER`-wide frame.
fn draw_box(im: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    for y in y0..y1 {
        for x in x0..x1 {
            let on_edge = y < y0 + BORDER || y >= y1 - BORDER || x < x0 + BORDER || x >= x1 - BORDER;
            if on_edge {
                im.put_pixel(x, y, BORDER_COLOR);
            }
        }
    }
}

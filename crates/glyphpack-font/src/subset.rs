//! Font subsetting.

use glyphpack_core::alloc::{HashMap, HashSet};

use crate::font::{FALLBACK_GLYPH, Font};

/// What to do with the fallback glyph when subsetting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Always keep glyph 0, even if no requested character maps to it.
    #[default]
    Keep,
    /// Drop glyph 0 unless a requested character maps to it.
    RemoveUnlessMapped,
}

/// Reduce a font to the glyphs reachable from `required` code points.
///
/// Glyphs keep their relative order and are renumbered densely; the charmap
/// is rebuilt for the requested code points only, through an old-to-new
/// index table. Charmap values that pointed past the end of the glyph list
/// are treated as references to the fallback glyph. Metrics are carried
/// over; textures and placements are not.
///
/// The input font is not modified.
pub fn subset(font: &Font, required: &HashSet<u32>, fallback: FallbackPolicy) -> Font {
    let glyph_count = font.glyphs.len();
    let resolve = |glyph: u32| {
        if (glyph as usize) < glyph_count {
            glyph
        } else {
            FALLBACK_GLYPH
        }
    };

    let mut reachable: HashSet<u32> = required
        .iter()
        .filter_map(|c| font.charmap.get(c))
        .map(|&g| resolve(g))
        .collect();
    if fallback == FallbackPolicy::Keep {
        reachable.insert(FALLBACK_GLYPH);
    }

    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut glyphs = Vec::with_capacity(reachable.len());
    for (index, glyph) in font.glyphs.iter().enumerate() {
        if reachable.contains(&(index as u32)) {
            remap.insert(index as u32, glyphs.len() as u32);
            let mut glyph = glyph.clone();
            glyph.placement = None;
            glyphs.push(glyph);
        }
    }

    let mut charmap = HashMap::new();
    for (&codepoint, &glyph) in font.charmap.iter() {
        if !required.contains(&codepoint) {
            continue;
        }
        match remap.get(&resolve(glyph)) {
            Some(&new_index) => {
                charmap.insert(codepoint, new_index);
            }
            None => {
                // Only possible when the source font has no glyphs at all.
                tracing::warn!(
                    "Dropping U+{:04X}: glyph {} does not exist",
                    codepoint,
                    glyph
                );
            }
        }
    }

    tracing::debug!(
        "Subset {} glyphs to {}, {} charmap entries to {}",
        glyph_count,
        glyphs.len(),
        font.charmap.len(),
        charmap.len()
    );

    Font {
        metrics: font.metrics,
        charmap,
        glyphs,
        textures: Vec::new(),
    }
}

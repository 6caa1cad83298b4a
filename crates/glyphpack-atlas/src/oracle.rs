//! The packing oracle contract and its default tree-based implementation.

use glyphpack_core::geometry::{Pos, Rect, Size};

use crate::error::{PackError, PackResult};
use crate::tree::PackerNode;

/// Result of packing into one region sized by the packer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePack {
    /// Size of the region. Zero when nothing with area was submitted.
    pub bounds: Size<u32>,
    /// Position of each input rectangle, in input order.
    pub positions: Vec<Pos<u32>>,
}

/// Where one rectangle landed in a multi-page packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlacement {
    /// Index of the page.
    pub page: usize,
    /// Top-left corner within the page.
    pub pos: Pos<u32>,
}

/// Result of packing into fixed-size pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPack {
    /// Number of pages used. Zero when nothing with area was submitted.
    pub page_count: usize,
    /// Placement of each input rectangle, in input order.
    pub placements: Vec<PagePlacement>,
}

/// Rectangle bin-packing engine.
///
/// Implementations are pure: no I/O and no state carried between calls.
/// Rectangles are never rotated, and placed rectangles with area never
/// overlap within a region or page.
pub trait PackingOracle {
    /// Pack all rectangles into one region whose size the oracle chooses.
    fn pack_single(&self, sizes: &[Size<u32>]) -> PackResult<SinglePack>;

    /// Pack all rectangles into as few `page`-sized regions as possible.
    fn pack_multiple(&self, page: Size<u32>, sizes: &[Size<u32>]) -> PackResult<MultiPack>;
}

/// Default packing oracle built on a binary-tree guillotine packer.
///
/// Rectangles are inserted tallest first. Single-region packing starts from
/// a power-of-two square estimated from the total area and doubles the
/// shorter side until everything fits; the reported bounds are then trimmed
/// to the used extent.
#[derive(Debug, Clone, Copy)]
pub struct TreePacker {
    /// Largest width or height a single region may grow to.
    pub max_dimension: u32,
}

impl Default for TreePacker {
    fn default() -> Self {
        Self {
            max_dimension: 1 << 16,
        }
    }
}

impl TreePacker {
    /// Indices of rectangles with area, tallest (then widest) first.
    fn insertion_order(sizes: &[Size<u32>]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..sizes.len()).filter(|&i| !sizes[i].is_empty()).collect();
        order.sort_by(|&a, &b| {
            sizes[b]
                .height
                .cmp(&sizes[a].height)
                .then(sizes[b].width.cmp(&sizes[a].width))
                .then(a.cmp(&b))
        });
        order
    }

    /// Try to pack everything in `order` into one region of `region` size.
    fn try_region(
        sizes: &[Size<u32>],
        order: &[usize],
        region: Size<u32>,
    ) -> Option<Vec<Pos<u32>>> {
        let mut root = PackerNode::new(region);
        let mut positions = vec![Pos::new(0, 0); sizes.len()];
        for &i in order {
            positions[i] = root.insert(sizes[i])?;
        }
        Some(positions)
    }
}

impl PackingOracle for TreePacker {
    fn pack_single(&self, sizes: &[Size<u32>]) -> PackResult<SinglePack> {
        let order = Self::insertion_order(sizes);
        if order.is_empty() {
            return Ok(SinglePack {
                bounds: Size::new(0, 0),
                positions: vec![Pos::new(0, 0); sizes.len()],
            });
        }

        let area: u64 = order.iter().map(|&i| sizes[i].area()).sum();
        let max_w = order.iter().map(|&i| sizes[i].width).max().unwrap_or(0);
        let max_h = order.iter().map(|&i| sizes[i].height).max().unwrap_or(0);
        let side = (area as f64).sqrt().ceil() as u64;

        let mut width = pow2_at_least(side.max(max_w as u64));
        let mut height = pow2_at_least(area.div_ceil(width).max(max_h as u64));

        loop {
            if width > self.max_dimension as u64 || height > self.max_dimension as u64 {
                return Err(PackError::RegionTooLarge {
                    limit: self.max_dimension,
                });
            }
            let region = Size::new(width as u32, height as u32);
            if let Some(positions) = Self::try_region(sizes, &order, region) {
                let mut bounds = Size::new(0u32, 0u32);
                for &i in &order {
                    let rect = Rect::new(positions[i], sizes[i]);
                    bounds.width = bounds.width.max(rect.right() as u32);
                    bounds.height = bounds.height.max(rect.bottom() as u32);
                }
                tracing::trace!(
                    "Packed {} rectangles into {} (region {})",
                    order.len(),
                    bounds,
                    region
                );
                return Ok(SinglePack { bounds, positions });
            }
            if width <= height {
                width *= 2;
            } else {
                height *= 2;
            }
        }
    }

    fn pack_multiple(&self, page: Size<u32>, sizes: &[Size<u32>]) -> PackResult<MultiPack> {
        if page.is_empty() {
            return Err(PackError::ZeroPageSize);
        }

        let order = Self::insertion_order(sizes);
        let mut pages: Vec<PackerNode> = Vec::new();
        let mut placements = vec![
            PagePlacement {
                page: 0,
                pos: Pos::new(0, 0),
            };
            sizes.len()
        ];

        'rects: for &i in &order {
            let size = sizes[i];
            if size.width > page.width || size.height > page.height {
                return Err(PackError::RectTooLarge {
                    index: i,
                    size,
                    page,
                });
            }
            for (index, root) in pages.iter_mut().enumerate() {
                if let Some(pos) = root.insert(size) {
                    placements[i] = PagePlacement { page: index, pos };
                    continue 'rects;
                }
            }
            let mut root = PackerNode::new(page);
            let pos = root
                .insert(size)
                .ok_or(PackError::RectTooLarge { index: i, size, page })?;
            placements[i] = PagePlacement {
                page: pages.len(),
                pos,
            };
            pages.push(root);
        }

        tracing::trace!(
            "Packed {} rectangles into {} pages of {}",
            order.len(),
            pages.len(),
            page
        );
        Ok(MultiPack {
            page_count: pages.len(),
            placements,
        })
    }
}

fn pow2_at_least(value: u64) -> u64 {
    value.max(1).next_power_of_two()
}

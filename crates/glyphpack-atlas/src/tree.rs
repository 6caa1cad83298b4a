//! Binary-tree guillotine packing within one fixed region.

use glyphpack_core::geometry::{Pos, Rect, Size};

/// Recursive free-space tree for one packing region.
#[derive(Debug, Clone)]
pub(crate) enum PackerNode {
    /// Free space that can be split.
    Empty { rect: Rect<u32> },
    /// Space occupied by one rectangle.
    Filled,
    /// Space split into two children.
    Split {
        left: Box<PackerNode>,
        right: Box<PackerNode>,
    },
}

impl PackerNode {
    pub(crate) fn new(size: Size<u32>) -> Self {
        Self::Empty {
            rect: Rect::new(Pos::new(0, 0), size),
        }
    }

    /// Try to reserve a `size` rectangle, returning its top-left corner.
    pub(crate) fn insert(&mut self, size: Size<u32>) -> Option<Pos<u32>> {
        match self {
            PackerNode::Empty { rect } => {
                let rect = *rect;
                if size.width > rect.width || size.height > rect.height {
                    return None;
                }

                if size.width == rect.width && size.height == rect.height {
                    *self = PackerNode::Filled;
                    return Some(Pos::new(rect.x, rect.y));
                }

                // Split along the axis with more leftover space.
                let horizontal_waste = rect.width - size.width;
                let vertical_waste = rect.height - size.height;

                let (left_rect, right_rect) = if horizontal_waste > vertical_waste {
                    (
                        Rect {
                            x: rect.x,
                            y: rect.y,
                            width: size.width,
                            height: rect.height,
                        },
                        Rect {
                            x: rect.x + size.width,
                            y: rect.y,
                            width: horizontal_waste,
                            height: rect.height,
                        },
                    )
                } else {
                    (
                        Rect {
                            x: rect.x,
                            y: rect.y,
                            width: rect.width,
                            height: size.height,
                        },
                        Rect {
                            x: rect.x,
                            y: rect.y + size.height,
                            width: rect.width,
                            height: vertical_waste,
                        },
                    )
                };

                let mut left = Box::new(PackerNode::Empty { rect: left_rect });
                let right = Box::new(PackerNode::Empty { rect: right_rect });
                let result = left.insert(size);
                *self = PackerNode::Split { left, right };
                result
            }
            PackerNode::Filled => None,
            PackerNode::Split { left, right } => {
                left.insert(size).or_else(|| right.insert(size))
            }
        }
    }
}

// =============================================================================
// GEOMETRY.RS: Geometric primitives for tile grids
//
// The small amount of geometry the tilemap queries share:
// - Axis-aligned rectangles (object bounds, tile rects, sheet regions)
// - Neighbour offsets in the fixed order the pathfinder relies on
// =============================================================================

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space, stored as top-left corner + size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Top-left corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min() + self.size() * 0.5
    }

    /// Strict overlap test: rectangles that only share an edge do NOT overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + self.width > other.x
            && self.x < other.x + other.width
            && self.y + self.height > other.y
            && self.y < other.y + other.height
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    /// Negative values grow the rectangle instead.
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            self.width - dx * 2.0,
            self.height - dy * 2.0,
        )
    }
}

// =============================================================================
// NEIGHBOUR ORDER
// =============================================================================

/// The 8 grid neighbours as (dx, dy) offsets, in the order both the distance
/// flood and the backward path walk visit them: the 4 orthogonals first
/// (up, right, down, left), then the diagonals (up-right, right-down,
/// left-down, up-left).
///
/// The walk takes the first qualifying neighbour, so this order decides which
/// of several equally short paths is returned.
pub const NEIGHBOR_ORDER: [(i32, i32); 8] = [
    (0, -1),  // up
    (1, 0),   // right
    (0, 1),   // down
    (-1, 0),  // left
    (1, -1),  // up-right
    (1, 1),   // right-down
    (-1, 1),  // left-down
    (-1, -1), // up-left
];

/// True for the four diagonal offsets.
#[inline]
pub fn is_diagonal((dx, dy): (i32, i32)) -> bool {
    dx != 0 && dy != 0
}

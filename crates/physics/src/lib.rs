#![warn(missing_docs)]
//! Actor physics for the tile world: bounding boxes, tile collision and kinematics.

mod body;
mod collision;

pub use body::*;
pub use collision::*;

/// Axis-aligned bounding box of a moving actor, in pixels.
///
/// `(x, y)` is the top-left corner; `y` grows downward like grid rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl ActorBounds {
    /// Create a box, clamping negative sizes to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0);
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same box moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Tests overlap with another box. Touching edges do not overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

//! Tile collision for actor bounding boxes.
//!
//! Two passes, horizontal then vertical. Each pass sweeps the box over the
//! whole proposed displacement, so a fast fall cannot skip a row. Every tile
//! the swept box overlaps counts, however thin the overlap; tiles the box
//! only touches along an edge do not.

use crate::ActorBounds;
use std::ops::Range;
use terra2d_world::WorldGrid;
use tracing::trace;

/// Adjusted position after one resolution call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Resolved left edge.
    pub x: f32,
    /// Resolved top edge.
    pub y: f32,
    /// The actor is resting on a solid tile.
    pub landed_on_ground: bool,
    /// The horizontal move was rejected.
    pub blocked_x: bool,
    /// The vertical move was cut short.
    pub blocked_y: bool,
}

/// Resolves proposed displacements against the solid cells of a [`WorldGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    tile_size: f32,
}

impl CollisionResolver {
    /// Resolver for tiles `tile_size` pixels square.
    pub fn new(tile_size: f32) -> Self {
        debug_assert!(tile_size > 0.0);
        Self { tile_size }
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Tile indices overlapped by the pixel span `[start, end)`.
    pub fn tile_span(&self, start: f32, end: f32) -> Range<i32> {
        let first = (start / self.tile_size).floor() as i32;
        let last = (end / self.tile_size).ceil() as i32;
        first..last.max(first)
    }

    /// Cut a span down to the indices that exist in a dimension of length `len`.
    ///
    /// Out-of-bounds tiles are never solid, so this only bounds the scan.
    fn clip(span: Range<i32>, len: usize) -> Range<i32> {
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        span.start.max(0)..span.end.min(len)
    }

    fn any_solid(grid: &WorldGrid, columns: &Range<i32>, row: i32) -> bool {
        columns.clone().any(|x| grid.is_solid(x, row))
    }

    /// Whether the row directly under `bounds` has a solid tile beneath any of its columns.
    pub fn is_supported(&self, bounds: &ActorBounds, grid: &WorldGrid) -> bool {
        let columns = Self::clip(self.tile_span(bounds.x, bounds.right()), grid.width());
        let row = (bounds.bottom() / self.tile_size).floor() as i32;
        Self::any_solid(grid, &columns, row)
    }

    /// Move `bounds` by `(dx, dy)` as far as the grid allows.
    pub fn resolve(&self, bounds: &ActorBounds, dx: f32, dy: f32, grid: &WorldGrid) -> Resolution {
        let (x, blocked_x) = self.resolve_horizontal(bounds, dx, grid);
        let moved = ActorBounds { x, ..*bounds };
        let (y, blocked_y, landed_on_ground) = self.resolve_vertical(&moved, dy, grid);

        if blocked_x || blocked_y {
            trace!(x, y, blocked_x, blocked_y, landed_on_ground, "collision");
        }
        Resolution {
            x,
            y,
            landed_on_ground,
            blocked_x,
            blocked_y,
        }
    }

    fn resolve_horizontal(&self, bounds: &ActorBounds, dx: f32, grid: &WorldGrid) -> (f32, bool) {
        if dx == 0.0 {
            return (bounds.x, false);
        }
        let target = bounds.x + dx;
        let columns = Self::clip(
            self.tile_span(bounds.x.min(target), bounds.right().max(target + bounds.width)),
            grid.width(),
        );
        let rows = Self::clip(self.tile_span(bounds.y, bounds.bottom()), grid.height());

        let blocked = rows.into_iter().any(|row| Self::any_solid(grid, &columns, row));
        if blocked {
            (bounds.x, true)
        } else {
            (target, false)
        }
    }

    fn resolve_vertical(&self, bounds: &ActorBounds, dy: f32, grid: &WorldGrid) -> (f32, bool, bool) {
        let columns = Self::clip(self.tile_span(bounds.x, bounds.right()), grid.width());

        if dy > 0.0 {
            let rows = Self::clip(self.tile_span(bounds.y, bounds.bottom() + dy), grid.height());
            // Highest blocking row is the first one hit going down.
            if let Some(row) = rows.into_iter().find(|&row| Self::any_solid(grid, &columns, row)) {
                let y = row as f32 * self.tile_size - bounds.height;
                return (y, true, true);
            }
            (bounds.y + dy, false, false)
        } else if dy < 0.0 {
            let rows = Self::clip(self.tile_span(bounds.y + dy, bounds.bottom()), grid.height());
            if let Some(row) = rows
                .into_iter()
                .rev()
                .find(|&row| Self::any_solid(grid, &columns, row))
            {
                let y = (row + 1) as f32 * self.tile_size;
                return (y, true, false);
            }
            (bounds.y + dy, false, false)
        } else {
            (bounds.y, false, self.is_supported(bounds, grid))
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(32.0)
    }
}

//! Property-based tests for tile collision
//!
//! Critical invariants:
//! - A zero displacement never moves the actor
//! - With zero displacement, ground state equals "solid tile directly below"
//! - A resolved box never ends up overlapping a solid tile it was not already in
//! - Landing always puts the bottom edge exactly on a tile boundary

use proptest::prelude::*;
use terra2d_core::{BlockKind, Cell};
use terra2d_physics::{ActorBounds, CollisionResolver};
use terra2d_world::WorldGrid;

const TILE: f32 = 32.0;
const WIDTH: usize = 12;
const HEIGHT: usize = 12;

fn solid_mask() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.15), WIDTH * HEIGHT)
}

fn grid_from(mask: &[bool]) -> WorldGrid {
    let mut grid = WorldGrid::new(WIDTH, HEIGHT);
    for (i, &solid) in mask.iter().enumerate() {
        if solid {
            let (x, y) = ((i % WIDTH) as i32, (i / WIDTH) as i32);
            grid.set(x, y, Cell::new(BlockKind::Stone)).unwrap();
        }
    }
    grid
}

fn overlaps_solid(resolver: &CollisionResolver, bounds: &ActorBounds, grid: &WorldGrid) -> bool {
    let columns = resolver.tile_span(bounds.x, bounds.right());
    resolver
        .tile_span(bounds.y, bounds.bottom())
        .any(|row| columns.clone().any(|col| grid.is_solid(col, row)))
}

proptest! {
    /// Property: Zero displacement returns the same position, grounded iff supported
    #[test]
    fn zero_displacement_is_idempotent(
        mask in solid_mask(),
        col in 0i32..WIDTH as i32 - 1,
        row in 0i32..HEIGHT as i32 - 2,
        fx in 0u8..32,
    ) {
        let grid = grid_from(&mask);
        let resolver = CollisionResolver::new(TILE);
        let bounds = ActorBounds::new(col as f32 * TILE + fx as f32, row as f32 * TILE, TILE, 2.0 * TILE);

        let res = resolver.resolve(&bounds, 0.0, 0.0, &grid);
        prop_assert_eq!(res.x, bounds.x);
        prop_assert_eq!(res.y, bounds.y);

        // Bottom edge sits on the top of row `row + 2`.
        let below = row + 2;
        let mut supported = grid.is_solid(col, below);
        if fx > 0 {
            supported |= grid.is_solid(col + 1, below);
        }
        prop_assert_eq!(res.landed_on_ground, supported);
    }

    /// Property: Starting clear of solids, a resolved move stays clear of solids
    #[test]
    fn resolved_move_never_enters_solid(
        mask in solid_mask(),
        x in 0.0f32..(WIDTH as f32 - 1.0) * TILE,
        y in 0.0f32..(HEIGHT as f32 - 2.0) * TILE,
        dx in -40.0f32..40.0,
        dy in -40.0f32..40.0,
    ) {
        let grid = grid_from(&mask);
        let resolver = CollisionResolver::new(TILE);
        let bounds = ActorBounds::new(x, y, 24.0, 48.0);
        prop_assume!(!overlaps_solid(&resolver, &bounds, &grid));

        let res = resolver.resolve(&bounds, dx, dy, &grid);
        let after = ActorBounds::new(res.x, res.y, bounds.width, bounds.height);
        prop_assert!(
            !overlaps_solid(&resolver, &after, &grid),
            "moved from ({}, {}) by ({}, {}) into solid at ({}, {})",
            x, y, dx, dy, res.x, res.y
        );
    }

    /// Property: Landing puts the bottom edge on a tile boundary
    #[test]
    fn landing_snaps_to_tile_boundary(
        mask in solid_mask(),
        x in 0.0f32..(WIDTH as f32 - 1.0) * TILE,
        y in 0.0f32..(HEIGHT as f32 - 2.0) * TILE,
        dy in 0.1f32..64.0,
    ) {
        let grid = grid_from(&mask);
        let resolver = CollisionResolver::new(TILE);
        let bounds = ActorBounds::new(x, y, 24.0, 48.0);
        prop_assume!(!overlaps_solid(&resolver, &bounds, &grid));

        let res = resolver.resolve(&bounds, 0.0, dy, &grid);
        if res.landed_on_ground {
            let bottom = res.y + bounds.height;
            prop_assert_eq!(bottom % TILE, 0.0, "bottom edge {}", bottom);
            prop_assert!(res.y <= y + dy);
        } else {
            prop_assert_eq!(res.y, y + dy);
        }
    }
}

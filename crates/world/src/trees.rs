//! Tree placement on the generated surface.
//!
//! Trees root on the grass line, grow a wooden trunk straight up and get a
//! square leaf canopy that only fills empty space.

use crate::grid::{TilePos, WorldGrid};
use crate::heightmap::HeightMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use terra2d_core::{BlockKind, Cell};
use tracing::{debug, instrument, trace};

/// Knobs for tree placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationParams {
    /// Columns skipped at each world edge.
    pub edge_margin: usize,
    /// Chance per eligible column of attempting a tree.
    pub tree_chance: f64,
    /// Shortest trunk, in rows.
    pub min_trunk: u32,
    /// Tallest trunk, in rows.
    pub max_trunk: u32,
    /// Canopy half-size; the canopy square is `2 * radius + 1` wide.
    pub canopy_radius: u32,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            edge_margin: 5,
            tree_chance: 0.10,
            min_trunk: 3,
            max_trunk: 6,
            canopy_radius: 2,
        }
    }
}

/// A placed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tree {
    /// Trunk base: the grass cell the tree replaced.
    pub base: TilePos,
    /// Trunk length in rows.
    pub trunk_height: u32,
}

impl Tree {
    /// Create a tree rooted at `base`.
    pub fn new(base: TilePos, trunk_height: u32) -> Self {
        Self { base, trunk_height }
    }

    /// Centre of the canopy: the cell directly above the trunk top.
    pub fn canopy_center(&self) -> TilePos {
        self.base.offset(0, -(self.trunk_height as i32))
    }

    /// Write the trunk and canopy into `grid`.
    ///
    /// The trunk overwrites its own column; leaves only land on in-bounds air.
    pub fn grow_into(&self, grid: &mut WorldGrid, canopy_radius: u32) {
        for i in 0..self.trunk_height as i32 {
            let pos = self.base.offset(0, -i);
            if grid.set(pos.x, pos.y, Cell::new(BlockKind::Wood)).is_err() {
                // Trunk ran off the top of the world.
                break;
            }
        }

        let center = self.canopy_center();
        let r = canopy_radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let pos = center.offset(dx, dy);
                if let Ok(cell) = grid.cell_mut(pos.x, pos.y) {
                    if cell.is_air() {
                        *cell = Cell::new(BlockKind::Leaves);
                    }
                }
            }
        }
    }
}

/// Stamps trees onto a freshly layered world.
#[derive(Debug, Clone, Copy, Default)]
pub struct VegetationPlacer {
    params: VegetationParams,
}

impl VegetationPlacer {
    pub fn new(params: VegetationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VegetationParams {
        &self.params
    }

    /// Roll for a tree in every interior column and grow the ones that fit.
    ///
    /// A column only takes a tree while its grass-line cell is still grass,
    /// so a neighbour's canopy or trunk blocks it.
    #[instrument(skip_all, fields(width = grid.width()))]
    pub fn place<R: Rng + ?Sized>(
        &self,
        grid: &mut WorldGrid,
        height_map: &HeightMap,
        rng: &mut R,
    ) -> Vec<Tree> {
        let params = &self.params;
        // NaN or infinite chances plant nothing.
        let chance = if params.tree_chance.is_finite() {
            params.tree_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (min_trunk, max_trunk) = if params.min_trunk <= params.max_trunk {
            (params.min_trunk, params.max_trunk)
        } else {
            (params.max_trunk, params.min_trunk)
        };

        let start = params.edge_margin;
        let end = grid.width().saturating_sub(params.edge_margin);
        let mut placed = Vec::new();

        for x in start..end {
            if !rng.gen_bool(chance) {
                continue;
            }
            let trunk_height = rng.gen_range(min_trunk..=max_trunk);

            let Some(grass_row) = height_map.grass_row(x) else {
                continue;
            };
            let base = TilePos::new(x as i32, grass_row);
            if grid.kind(base.x, base.y) != Ok(BlockKind::Grass) {
                trace!(%base, "tree site no longer grass");
                continue;
            }

            let tree = Tree::new(base, trunk_height);
            tree.grow_into(grid, params.canopy_radius);
            placed.push(tree);
        }

        debug!(trees = placed.len(), "vegetation placed");
        placed
    }
}

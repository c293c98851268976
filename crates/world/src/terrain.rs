//! Terrain generation: layering a height map into blocks, then decorating it.
//!
//! Columns are filled top to bottom: air down to and including the noise
//! line, one row of grass, two rows of dirt, then stone and ore, with water
//! always on the bottom row.

use crate::config::WorldConfig;
use crate::grid::WorldGrid;
use crate::heightmap::HeightMap;
use crate::noise::{perlin_seed, NoiseSource, PerlinNoise};
use crate::ores::OreDistributor;
use crate::trees::{Tree, VegetationPlacer};
use rand::Rng;
use terra2d_core::{world_rng, BlockKind, Cell, RngStream};
use tracing::{debug, instrument};

/// Rows of dirt between the grass line and the underground band.
pub const DIRT_DEPTH: i32 = 2;

/// Fills a fresh grid from a height map.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainLayerBuilder;

impl TerrainLayerBuilder {
    /// Block for row `y` of a column whose noise line is `surface`.
    ///
    /// Returns `None` for rows in the underground band, which the ore roll decides.
    pub fn layer_for(y: i32, surface: i32, world_height: usize) -> Option<BlockKind> {
        if y == world_height as i32 - 1 {
            Some(BlockKind::Water)
        } else if y <= surface {
            Some(BlockKind::Air)
        } else if y == surface + 1 {
            Some(BlockKind::Grass)
        } else if y <= surface + 1 + DIRT_DEPTH {
            Some(BlockKind::Dirt)
        } else {
            None
        }
    }

    /// Build a fully populated `world_width x world_height` grid.
    ///
    /// Columns past the end of `height_map` hold only air and the water floor.
    #[instrument(skip(height_map, rng))]
    pub fn build<R: Rng + ?Sized>(
        world_width: usize,
        world_height: usize,
        height_map: &HeightMap,
        rng: &mut R,
    ) -> WorldGrid {
        let mut grid = WorldGrid::new(world_width, world_height);
        let mut underground = 0usize;

        for x in 0..world_width {
            let surface = height_map.get(x).unwrap_or(world_height as i32);
            for y in 0..world_height as i32 {
                let kind = match Self::layer_for(y, surface, world_height) {
                    Some(kind) => kind,
                    None => {
                        underground += 1;
                        OreDistributor::roll(rng)
                    }
                };
                if kind != BlockKind::Air {
                    if let Ok(cell) = grid.cell_mut(x as i32, y) {
                        *cell = Cell::new(kind);
                    }
                }
            }
        }

        debug!(underground, "terrain layered");
        grid
    }
}

/// Output of a full generation run.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub grid: WorldGrid,
    pub height_map: HeightMap,
    pub trees: Vec<Tree>,
}

impl GeneratedWorld {
    /// Pixel position that drops an actor of `actor_height` pixels onto column `x`.
    ///
    /// The actor's bottom edge sits on the topmost solid tile; columns with no
    /// solid tile spawn at the top of the world.
    pub fn spawn_point(&self, x: usize, tile_size: f32, actor_height: f32) -> (f32, f32) {
        let column = x.min(self.grid.width().saturating_sub(1));
        let px = column as f32 * tile_size;
        let py = match self.grid.top_solid_row(column) {
            Some(row) => (row as f32 * tile_size - actor_height).max(0.0),
            None => 0.0,
        };
        (px, py)
    }
}

/// Runs the whole pipeline: noise, height map, layering with ores, vegetation.
pub struct WorldGenerator {
    config: WorldConfig,
    noise: Box<dyn NoiseSource>,
}

impl WorldGenerator {
    /// Generator backed by Perlin noise seeded from `config.seed`.
    pub fn new(config: WorldConfig) -> Self {
        let noise = PerlinNoise::new(perlin_seed(config.seed));
        Self::with_noise(config, Box::new(noise))
    }

    /// Generator backed by a caller-provided noise source.
    pub fn with_noise(config: WorldConfig, noise: Box<dyn NoiseSource>) -> Self {
        Self { config, noise }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Generate a world. Same config and noise give the same world.
    #[instrument(skip(self), fields(seed = self.config.seed, width = self.config.width, height = self.config.height))]
    pub fn generate(&self) -> GeneratedWorld {
        debug!("Starting world generation");
        let cfg = &self.config;

        let height_map = HeightMap::generate(self.noise.as_ref(), cfg.width, cfg.height, &cfg.terrain);

        let mut ore_rng = world_rng(cfg.seed, RngStream::Ores);
        let mut grid = TerrainLayerBuilder::build(cfg.width, cfg.height, &height_map, &mut ore_rng);

        let mut tree_rng = world_rng(cfg.seed, RngStream::Vegetation);
        let trees = VegetationPlacer::new(cfg.vegetation).place(&mut grid, &height_map, &mut tree_rng);

        debug!(trees = trees.len(), "World generation complete");
        GeneratedWorld {
            grid,
            height_map,
            trees,
        }
    }
}

//! World generation settings.

use crate::heightmap::HeightParams;
use crate::trees::VegetationParams;
use serde::{Deserialize, Serialize};

/// Default world seed used by tools when none is given.
pub const DEFAULT_SEED: u64 = 12345;

/// Everything the generation pipeline needs to build one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Columns.
    pub width: usize,
    /// Rows. The bottom row is always water.
    pub height: usize,
    /// Seed for the noise permutation and the ore/vegetation streams.
    pub seed: u64,
    /// Surface line shape.
    pub terrain: HeightParams,
    /// Tree placement knobs.
    pub vegetation: VegetationParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            seed: DEFAULT_SEED,
            terrain: HeightParams::default(),
            vegetation: VegetationParams::default(),
        }
    }
}

impl WorldConfig {
    /// Same settings with a different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Same settings with different dimensions.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

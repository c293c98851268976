//! Procedural 2-D world generation and the tile grid it produces.
//!
//! Pipeline: [`PerlinNoise`] feeds [`HeightMap::generate`], [`TerrainLayerBuilder`]
//! layers the columns and rolls ores through [`OreDistributor`], and
//! [`VegetationPlacer`] plants trees. [`WorldGenerator`] runs all of it.

mod config;
mod editing;
mod grid;
mod heightmap;
mod inventory;
mod noise;
mod ores;
mod terrain;
mod trees;

pub use config::*;
pub use editing::*;
pub use grid::*;
pub use heightmap::*;
pub use inventory::*;
pub use self::noise::{perlin_seed, ConstantNoise, NoiseParams, NoiseSource, PerlinNoise};
pub use ores::*;
pub use terrain::*;
pub use trees::*;

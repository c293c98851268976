//! Coherent noise used to shape the surface line.
//!
//! Provides the 1-D fractal noise primitive the height map generator samples.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Octave parameters for fractal sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Number of octaves (layers of detail)
    pub octaves: u32,
    /// Amplitude multiplier between octaves
    pub persistence: f64,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// A deterministic 1-D coherent noise function.
///
/// Same inputs must give the same output, always within `[-1.0, 1.0]`.
/// Seeding is done by the implementor or by offsetting `coordinate`.
pub trait NoiseSource {
    /// Sample fractal noise at `coordinate`.
    fn sample(&self, coordinate: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64;

    /// Sample with a bundled parameter set.
    fn sample_with(&self, coordinate: f64, params: &NoiseParams) -> f64 {
        self.sample(
            coordinate,
            params.octaves,
            params.persistence,
            params.lacunarity,
        )
    }
}

/// Row of the 2-D Perlin field that 1-D samples are read from.
///
/// Kept off the integer lattice, where gradient noise is identically zero.
const SAMPLE_ROW: f64 = 0.5;

/// Fold a 64-bit world seed into the 32-bit Perlin seed.
///
/// Both halves contribute, so seeds that differ only in the high bits still
/// get different permutation tables.
pub fn perlin_seed(world_seed: u64) -> u32 {
    (world_seed ^ (world_seed >> 32)) as u32
}

/// Perlin noise generator.
pub struct PerlinNoise {
    perlin: Perlin,
    seed: u32,
}

impl PerlinNoise {
    /// Create a generator whose permutation table is derived from `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// Seed this generator was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, coordinate: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.max(1) {
            value += self.perlin.get([coordinate * frequency, SAMPLE_ROW]) * amplitude;
            max_value += amplitude;

            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_value == 0.0 {
            return 0.0;
        }

        // Normalize to [-1.0, 1.0]
        (value / max_value).clamp(-1.0, 1.0)
    }
}

/// A flat field returning the same value everywhere.
///
/// Useful for pinning the surface line in tests and tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _coordinate: f64, _octaves: u32, _persistence: f64, _lacunarity: f64) -> f64 {
        self.0.clamp(-1.0, 1.0)
    }
}

//! Heightmap generation for terrain.
//!
//! Converts 1-D noise into one surface row per world column.

use crate::noise::{NoiseParams, NoiseSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Shape of the surface band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightParams {
    /// Horizontal stretch: column `x` samples noise at `x / scale`.
    pub scale: f64,
    /// Octave settings handed to the noise source.
    pub noise: NoiseParams,
    /// Fraction of the world height the surface may swing over.
    pub amplitude: f64,
    /// Fraction of the world height kept clear above the highest surface.
    pub offset: f64,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            scale: 50.0,
            noise: NoiseParams::default(),
            amplitude: 0.6,
            offset: 0.2,
        }
    }
}

/// Surface rows for every column of a world.
///
/// Each value is the noise line of that column; rows grow downward, so a
/// smaller value is a taller hill. Values always lie in `[0, world_height)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightMap {
    heights: Vec<i32>,
}

impl HeightMap {
    /// Sample `noise` once per column and map it into the surface band.
    #[instrument(skip(noise, params))]
    pub fn generate(
        noise: &dyn NoiseSource,
        world_width: usize,
        world_height: usize,
        params: &HeightParams,
    ) -> Self {
        let amplitude_rows = params.amplitude * world_height as f64;
        let offset_rows = (params.offset * world_height as f64).floor() as i32;
        let max_row = world_height.saturating_sub(1) as i32;

        let heights = (0..world_width)
            .map(|x| {
                let coordinate = if params.scale > 0.0 {
                    x as f64 / params.scale
                } else {
                    x as f64
                };
                let sample = noise.sample_with(coordinate, &params.noise);
                let normalized = (sample + 1.0) * 0.5;
                let row = (normalized * amplitude_rows).floor() as i32 + offset_rows;
                row.clamp(0, max_row)
            })
            .collect::<Vec<_>>();

        let map = Self { heights };
        debug!(
            min = map.min_height(),
            max = map.max_height(),
            "height map generated"
        );
        map
    }

    /// Wrap precomputed surface rows.
    pub fn from_heights(heights: Vec<i32>) -> Self {
        Self { heights }
    }

    /// Same surface row in every column.
    pub fn flat(world_width: usize, surface: i32) -> Self {
        Self {
            heights: vec![surface; world_width],
        }
    }

    /// Surface row of column `x`, if the column exists.
    pub fn get(&self, x: usize) -> Option<i32> {
        self.heights.get(x).copied()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Raw surface rows, one per column.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    /// Row of the grass line (one below the noise line) for column `x`.
    pub fn grass_row(&self, x: usize) -> Option<i32> {
        self.get(x).map(|surface| surface + 1)
    }

    /// Smallest surface row (the highest point).
    pub fn min_height(&self) -> i32 {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    /// Largest surface row (the lowest point).
    pub fn max_height(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// Mean surface row.
    pub fn avg_height(&self) -> f32 {
        if self.heights.is_empty() {
            return 0.0;
        }
        let sum: i64 = self.heights.iter().map(|&h| h as i64).sum();
        sum as f32 / self.heights.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ConstantNoise, PerlinNoise};

    #[test]
    fn test_heightmap_determinism() {
        let noise = PerlinNoise::new(12345);
        let params = HeightParams::default();
        let hm1 = HeightMap::generate(&noise, 100, 50, &params);
        let hm2 = HeightMap::generate(&noise, 100, 50, &params);
        assert_eq!(hm1, hm2);
        assert_eq!(hm1.width(), 100);
    }

    #[test]
    fn test_heightmap_range() {
        for seed in 0..20 {
            let noise = PerlinNoise::new(seed);
            let hm = HeightMap::generate(&noise, 200, 50, &HeightParams::default());
            for (x, &h) in hm.heights().iter().enumerate() {
                assert!((0..50).contains(&h), "Height {} at {} out of range", h, x);
            }
        }
    }

    #[test]
    fn test_band_bounds_follow_fractions() {
        // n = +1 maps to the bottom of the band, n = -1 to the top.
        let params = HeightParams::default();
        let low = HeightMap::generate(&ConstantNoise(1.0), 4, 50, &params);
        let high = HeightMap::generate(&ConstantNoise(-1.0), 4, 50, &params);
        let mid = HeightMap::generate(&ConstantNoise(0.0), 4, 50, &params);
        assert_eq!(low.heights(), &[40, 40, 40, 40]);
        assert_eq!(high.heights(), &[10, 10, 10, 10]);
        assert_eq!(mid.heights(), &[25, 25, 25, 25]);
    }

    #[test]
    fn test_out_of_band_params_are_clamped() {
        let params = HeightParams {
            amplitude: 2.0,
            offset: 0.9,
            ..HeightParams::default()
        };
        let hm = HeightMap::generate(&ConstantNoise(1.0), 3, 10, &params);
        assert_eq!(hm.heights(), &[9, 9, 9]);
    }

    #[test]
    fn test_different_seeds_produce_different_heightmaps() {
        let params = HeightParams::default();
        let hm1 = HeightMap::generate(&PerlinNoise::new(111), 100, 50, &params);
        let hm2 = HeightMap::generate(&PerlinNoise::new(222), 100, 50, &params);
        assert_ne!(
            hm1, hm2,
            "Different seeds should produce different heightmaps"
        );
    }

    #[test]
    fn test_heightmap_stats() {
        let hm = HeightMap::from_heights(vec![4, 8, 6]);
        assert_eq!(hm.min_height(), 4);
        assert_eq!(hm.max_height(), 8);
        assert!((hm.avg_height() - 6.0).abs() < 0.001);
        assert_eq!(hm.grass_row(1), Some(9));
        assert_eq!(hm.get(3), None);
    }

    #[test]
    fn test_empty_heightmap_stats() {
        let hm = HeightMap::from_heights(Vec::new());
        assert_eq!(hm.avg_height(), 0.0);
        assert_eq!(hm.min_height(), 0);
    }
}

//! Ore distribution for the underground band.
//!
//! Every underground cell rolls independently against a fixed cumulative
//! table, so ores scatter as single tiles rather than veins.

use rand::Rng;
use terra2d_core::BlockKind;

/// Cumulative upper bounds, checked in order; rolls past the last entry are stone.
pub const ORE_THRESHOLDS: [(f64, BlockKind); 4] = [
    (0.05, BlockKind::DiamondOre),
    (0.15, BlockKind::GoldOre),
    (0.35, BlockKind::IronOre),
    (0.65, BlockKind::CoalOre),
];

/// Picks the block for one underground cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct OreDistributor;

impl OreDistributor {
    /// Map a uniform roll in `[0, 1)` to a block kind; first matching threshold wins.
    pub fn classify(roll: f64) -> BlockKind {
        ORE_THRESHOLDS
            .iter()
            .find(|(upper, _)| roll < *upper)
            .map(|&(_, kind)| kind)
            .unwrap_or(BlockKind::Stone)
    }

    /// Draw a roll from `rng` and classify it.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> BlockKind {
        Self::classify(rng.gen::<f64>())
    }

    /// Probability that a single roll yields `kind`.
    pub fn probability(kind: BlockKind) -> f64 {
        let mut lower = 0.0;
        for &(upper, ore) in &ORE_THRESHOLDS {
            if ore == kind {
                return upper - lower;
            }
            lower = upper;
        }
        if kind == BlockKind::Stone {
            1.0 - lower
        } else {
            0.0
        }
    }
}

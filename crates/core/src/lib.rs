#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod block;
pub mod cell;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use block::{BlockKind, Rgb};
pub use cell::Cell;

/// Fixed simulation tick (60 TPS in the reference game loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Independent random streams drawn from one world seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    /// Per-cell ore rolls in the underground band.
    Ores,
    /// Tree placement, trunk heights.
    Vegetation,
    /// Per-tick actor rolls such as hunger decay.
    Actor,
}

impl RngStream {
    fn salt(self) -> u64 {
        match self {
            RngStream::Ores => 0x6f72_6573_0000_0001,
            RngStream::Vegetation => 0x7472_6565_0000_0002,
            RngStream::Actor => 0x6163_746f_0000_0003,
        }
    }
}

/// Helper to derive a reproducible RNG for one generation stream of a world.
pub fn world_rng(world_seed: u64, stream: RngStream) -> StdRng {
    StdRng::seed_from_u64(world_seed ^ stream.salt())
}

/// Errors raised by strict grid accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinate outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width in columns.
        width: usize,
        /// Grid height in rows.
        height: usize,
    },
}

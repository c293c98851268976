//! Actor health and hunger.

use rand::Rng;

pub const MAX_HEALTH: u32 = 100;
pub const MAX_HUNGER: u32 = 100;

/// Chance per tick that hunger drops by one point.
pub const HUNGER_DECAY_CHANCE: f64 = 0.001;

/// Health and hunger points, each capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub health: u32,
    pub hunger: u32,
}

impl Vitals {
    /// Full health, full hunger.
    pub fn new() -> Self {
        Self {
            health: MAX_HEALTH,
            hunger: MAX_HUNGER,
        }
    }

    /// Roll hunger decay for one tick. Returns true when hunger dropped.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let roll: f64 = rng.gen();
        self.decay_with(roll)
    }

    /// Apply one decay roll in `[0, 1)`.
    pub fn decay_with(&mut self, roll: f64) -> bool {
        if roll >= HUNGER_DECAY_CHANCE || self.hunger == 0 {
            return false;
        }
        self.hunger -= 1;
        true
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new()
    }
}

//! Per-kind block counts carried by an actor.
//!
//! Broken blocks go in, placed blocks come out of the selected kind.

use crate::editing::{BreakOutcome, EditError, PlaceOutcome};
use crate::grid::WorldGrid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terra2d_core::BlockKind;
use tracing::debug;

/// Block counts plus the kind that the next place request uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: BTreeMap<BlockKind, u32>,
    selected: BlockKind,
}

impl Inventory {
    /// Create an empty inventory with dirt selected.
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            selected: BlockKind::Dirt,
        }
    }

    /// Add `amount` of `kind`. Air and water are never stored.
    pub fn add(&mut self, kind: BlockKind, amount: u32) {
        if !kind.is_breakable() || amount == 0 {
            return;
        }
        let entry = self.counts.entry(kind).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove one of `kind`. Returns false if there was none.
    pub fn take(&mut self, kind: BlockKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&kind);
                }
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, kind: BlockKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn selected(&self) -> BlockKind {
        self.selected
    }

    /// Select the kind for subsequent place requests.
    pub fn select(&mut self, kind: BlockKind) -> Result<(), EditError> {
        if !kind.is_placeable() {
            return Err(EditError::NotPlaceable(kind));
        }
        self.selected = kind;
        Ok(())
    }

    /// Non-empty entries in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockKind, u32)> + '_ {
        self.counts.iter().map(|(&kind, &count)| (kind, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Hit `(x, y)` and collect the block if it broke.
    pub fn apply_break(&mut self, grid: &mut WorldGrid, x: i32, y: i32) -> Result<BreakOutcome, EditError> {
        let outcome = grid.break_block(x, y)?;
        if let BreakOutcome::Broken(kind) = outcome {
            self.add(kind, 1);
            debug!(x, y, %kind, total = self.count(kind), "collected block");
        }
        Ok(outcome)
    }

    /// Place one of the selected kind at `(x, y)`.
    ///
    /// Nothing is consumed unless the block is actually written.
    pub fn try_place(&mut self, grid: &mut WorldGrid, x: i32, y: i32) -> Result<(), EditError> {
        self.place_kind(grid, x, y, self.selected)
    }

    /// Place one `kind` at `(x, y)` and select it.
    ///
    /// A rejected request leaves both the counts and the selection untouched.
    pub fn place_kind(&mut self, grid: &mut WorldGrid, x: i32, y: i32, kind: BlockKind) -> Result<(), EditError> {
        if !kind.is_placeable() {
            return Err(EditError::NotPlaceable(kind));
        }
        if self.count(kind) == 0 {
            return Err(EditError::NothingToPlace(kind));
        }
        match grid.place_block(x, y, kind)? {
            PlaceOutcome::Placed => {
                self.take(kind);
                self.selected = kind;
                Ok(())
            }
            PlaceOutcome::Occupied(existing) => Err(EditError::Occupied(existing)),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

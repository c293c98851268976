//! Break and place primitives for single cells.
//!
//! Input binding lives with the caller; these only apply one request to the grid.

use crate::grid::WorldGrid;
use terra2d_core::{BlockKind, Cell, GridError};
use thiserror::Error;
use tracing::trace;

/// Result of one hit on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOutcome {
    /// The cell took damage but still stands.
    Damaged { remaining: u32 },
    /// The cell turned to air; carries what it used to be.
    Broken(BlockKind),
    /// Air or water; nothing happened.
    Unbreakable,
}

/// Result of a place request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The new block was written.
    Placed,
    /// Target cell was occupied; carries the occupant.
    Occupied(BlockKind),
}

/// Errors from edit requests that go through an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Coordinates outside the world.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Nothing of the selected kind left to place.
    #[error("no {0} left to place")]
    NothingToPlace(BlockKind),
    /// Kind cannot be placed by an actor.
    #[error("{0} cannot be placed")]
    NotPlaceable(BlockKind),
    /// Target cell already holds a block.
    #[error("cell is occupied by {0}")]
    Occupied(BlockKind),
}

impl WorldGrid {
    /// Hit the cell at `(x, y)` once.
    pub fn break_block(&mut self, x: i32, y: i32) -> Result<BreakOutcome, GridError> {
        let cell = self.get(x, y)?;
        if !cell.kind().is_breakable() {
            return Ok(BreakOutcome::Unbreakable);
        }

        let cell = self.cell_mut(x, y)?;
        let outcome = match cell.hit() {
            Some(kind) => BreakOutcome::Broken(kind),
            None => BreakOutcome::Damaged {
                remaining: cell.remaining_durability(),
            },
        };
        trace!(x, y, ?outcome, "block hit");
        Ok(outcome)
    }

    /// Write a fresh `kind` into `(x, y)` if the cell is air.
    pub fn place_block(&mut self, x: i32, y: i32, kind: BlockKind) -> Result<PlaceOutcome, GridError> {
        let current = self.kind(x, y)?;
        if current != BlockKind::Air {
            return Ok(PlaceOutcome::Occupied(current));
        }
        self.set(x, y, Cell::new(kind))?;
        trace!(x, y, %kind, "block placed");
        Ok(PlaceOutcome::Placed)
    }
}

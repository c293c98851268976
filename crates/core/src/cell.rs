//! A single world tile and its wear state.

use crate::block::BlockKind;
use serde::{Deserialize, Serialize};

/// One tile: a block kind plus the hits it can still take.
///
/// `remaining_durability` always lies in `[0, kind.max_durability()]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: BlockKind,
    remaining_durability: u32,
}

impl Default for Cell {
    fn default() -> Self {
        Self::AIR
    }
}

impl Cell {
    /// Empty space.
    pub const AIR: Cell = Cell::new(BlockKind::Air);

    /// Fresh cell at full durability.
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            remaining_durability: kind.max_durability(),
        }
    }

    /// Block kind held by this cell.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Hits left before the cell turns to air.
    pub fn remaining_durability(&self) -> u32 {
        self.remaining_durability
    }

    /// Shorthand for `self.kind().is_solid()`.
    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// Whether the cell holds air.
    pub fn is_air(&self) -> bool {
        self.kind == BlockKind::Air
    }

    /// Apply one hit.
    ///
    /// Returns the broken kind when this hit empties the cell; the cell is then Air.
    /// Air and unbreakable kinds are left untouched.
    pub fn hit(&mut self) -> Option<BlockKind> {
        if !self.kind.is_breakable() {
            return None;
        }
        self.remaining_durability = self.remaining_durability.saturating_sub(1);
        if self.remaining_durability == 0 {
            let broken = self.kind;
            *self = Cell::AIR;
            Some(broken)
        } else {
            None
        }
    }
}

impl From<BlockKind> for Cell {
    fn from(kind: BlockKind) -> Self {
        Cell::new(kind)
    }
}

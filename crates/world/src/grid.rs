//! The fixed-size tile grid every generation stage writes into.
//!
//! Strict accessors fail on out-of-bounds coordinates; [`WorldGrid::is_solid`]
//! treats them as empty so collision scans can run past the world edges.

use std::fmt;
use std::ops::Range;

use terra2d_core::{BlockKind, Cell, GridError};

/// Column/row coordinate of one tile. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile offset by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size tile world, stored row-major and owning every cell by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    dirty: bool,
}

impl WorldGrid {
    /// Allocate a grid filled with air.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, BlockKind::Air)
    }

    /// Allocate a grid with every cell set to a fresh `kind`.
    pub fn filled(width: usize, height: usize, kind: BlockKind) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::new(kind); width * height],
            dirty: true,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` addresses a cell.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Fetch a cell copy.
    pub fn get(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Kind at `(x, y)`.
    pub fn kind(&self, x: i32, y: i32) -> Result<BlockKind, GridError> {
        self.get(x, y).map(|cell| cell.kind())
    }

    /// Overwrite a cell wholesale.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        if self.cells[idx] != cell {
            self.cells[idx] = cell;
            self.dirty = true;
        }
        Ok(())
    }

    /// Mutable access to a single cell.
    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut Cell, GridError> {
        let idx = self.index(x, y)?;
        self.dirty = true;
        Ok(&mut self.cells[idx])
    }

    /// Whether `(x, y)` blocks movement.
    ///
    /// Out-of-bounds coordinates are open space, so edge scans never fail.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|cell| cell.is_solid()).unwrap_or(false)
    }

    /// Every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let pos = TilePos::new((idx % width) as i32, (idx / width) as i32);
            (pos, cell)
        })
    }

    /// One column, top to bottom.
    pub fn column(&self, x: usize) -> impl Iterator<Item = &Cell> + '_ {
        let width = self.width;
        let limit = if x < width { self.cells.len() } else { 0 };
        self.cells[..limit].iter().skip(x).step_by(width.max(1))
    }

    /// Topmost solid row in column `x`.
    pub fn top_solid_row(&self, x: usize) -> Option<i32> {
        self.column(x).position(|cell| cell.is_solid()).map(|y| y as i32)
    }

    /// Number of cells holding `kind`.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind() == kind).count()
    }

    /// Render one glyph per cell, one line per row.
    pub fn render_ascii(&self) -> String {
        self.render_columns(0..self.width)
    }

    /// Render only the columns in `columns` (clamped to the grid).
    pub fn render_columns(&self, columns: Range<usize>) -> String {
        let start = columns.start.min(self.width);
        let end = columns.end.min(self.width).max(start);
        let mut out = String::with_capacity((end - start + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)).take(self.height) {
            out.extend(row[start..end].iter().map(|cell| cell.kind().glyph()));
            out.push('\n');
        }
        out
    }

    /// Consume the redraw flag; true when cells changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Columns a renderer needs for a view `view_width` pixels wide starting at `camera_x`.
///
/// Includes one spare column for partial tiles at the right edge and never
/// leaves the world.
pub fn visible_columns(camera_x: f32, view_width: f32, tile_size: f32, world_width: usize) -> Range<usize> {
    if tile_size <= 0.0 {
        return 0..0;
    }
    let start = ((camera_x / tile_size).floor().max(0.0) as usize).min(world_width);
    let span = (view_width / tile_size).floor().max(0.0) as usize + 2;
    start..(start + span).min(world_width)
}

/// Camera left edge that centres `focus_x` without showing past the world edges.
pub fn follow_camera(focus_x: f32, view_width: f32, world_pixel_width: f32) -> f32 {
    let max_x = (world_pixel_width - view_width).max(0.0);
    (focus_x - view_width / 2.0).clamp(0.0, max_x)
}

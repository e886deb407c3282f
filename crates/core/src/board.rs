//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell holds a piece tag (0 = empty).
//! Uses a flat row-major buffer sized once at construction; no allocation after that.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Row 0 is the top row; pieces spawn there and may temporarily sit above it (y < 0).

use arrayvec::ArrayVec;

use crate::types::{Cell, EMPTY, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};

/// Row indices removed by one line-clear pass (bottom to top)
pub type ClearedRows = ArrayVec<usize, { MAX_BOARD_HEIGHT as usize }>;

/// The game board using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are validated by `EngineConfig`; the board itself trusts them.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check whether a block may occupy (x, y)
    ///
    /// Columns outside the board and rows at or below the floor are blocked.
    /// Rows above the top (y < 0) are open so freshly spawned or rotated pieces
    /// can poke out of the visible grid.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        y < 0 || self.get(x, y) == Some(EMPTY)
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY)
    }

    fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|&cell| cell != EMPTY)
    }

    /// Clear full rows and compact the rows above them downward.
    ///
    /// Single bottom-to-top pass with a write cursor: every scanned row is copied
    /// to the cursor row, and the cursor only moves up past rows that were not
    /// full, so full rows get overwritten by whatever sits above them. Row 0 is
    /// never tested for fullness. When anything was cleared, row 0 follows the
    /// compaction and the rows above it are emptied.
    ///
    /// Returns the original indices of the cleared rows, bottom to top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = self.width as usize;
        let height = self.height as usize;
        if width == 0 || height == 0 {
            return cleared;
        }
        let mut write_y = height - 1;

        for read_y in (1..height).rev() {
            let full = self.is_row_full(read_y);
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
            if full {
                cleared.push(read_y);
            } else {
                write_y -= 1;
            }
        }

        // write_y now equals the number of cleared rows.
        if write_y > 0 {
            self.cells.copy_within(0..width, write_y * width);
            self.cells[..write_y * width].fill(EMPTY);
        }

        cleared
    }

    /// Write `tag` into every on-board cell of `blocks`.
    ///
    /// Blocks above the top row are skipped.
    pub fn stamp(&mut self, blocks: &[(i32, i32)], tag: Cell) {
        for &(x, y) in blocks {
            self.set(x, y, tag);
        }
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics; a zero-width board simply has no rows
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Build a board from text rows for tests and fixtures.
    ///
    /// `.` is empty, a digit is the tag. Empty, ragged or oversized input is rejected.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first()?.len()).ok()?;
        if width == 0 || width > MAX_BOARD_WIDTH || height > MAX_BOARD_HEIGHT {
            return None;
        }
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width as usize {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => EMPTY,
                    d => u8::try_from(d.to_digit(10)?).ok()?,
                };
                board.set(x as i32, y as i32, cell);
            }
        }
        Some(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::BOARD_WIDTH, crate::types::BOARD_HEIGHT)
    }
}

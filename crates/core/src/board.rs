//! Board module - manages the game grid
//!
//! The board is a 10x20 grid of filled/empty cells stored as a flat array for
//! cache locality and zero allocation. It is never resized.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the board (y < 0) are legal positions for a falling piece but
//! never store anything.

use std::fmt;

use arrayvec::ArrayVec;

use crate::pieces::PieceShape;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Build a board from 20 rows of 10 cells each, given as 0/1 values.
    ///
    /// Returns `None` if the row count or any row width is wrong.
    pub fn from_rows(rows: &[[u8; WIDTH]]) -> Option<Self> {
        if rows.len() != HEIGHT {
            return None;
        }
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    board.cells[y * WIDTH + x] = Cell::Filled;
                }
            }
        }
        Some(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_filled(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Cell::Filled))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_filled())
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|cell| !cell.is_filled())
    }

    /// Cells of row `y`. Panics if `y` is off the board.
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// True when any mino of `shape` at origin `(x, y)` is out of bounds
    /// (left, right or bottom) or overlaps a filled cell. Minos above the
    /// board never collide.
    pub fn collides(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape.iter().any(|&(dx, dy)| {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || px >= BOARD_WIDTH as i8 || py >= BOARD_HEIGHT as i8 {
                return true;
            }
            py >= 0 && self.cells[(py as usize) * WIDTH + px as usize].is_filled()
        })
    }

    /// Write a piece into the grid. Minos above the board are dropped.
    /// Returns the number of full rows afterwards; nothing is cleared.
    pub fn lock_piece(&mut self, shape: &PieceShape, x: i8, y: i8) -> usize {
        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, Cell::Filled);
        }
        self.full_row_count()
    }

    /// Copy-based lock: returns the board after locking and clearing, plus the
    /// number of rows cleared. `self` is untouched.
    pub fn with_locked_piece(&self, shape: &PieceShape, x: i8, y: i8) -> (Board, usize) {
        let mut next = *self;
        next.lock_piece(shape, x, y);
        let cleared = next.clear_full_rows();
        (next, cleared)
    }

    pub fn full_row_count(&self) -> usize {
        (0..HEIGHT).filter(|&y| self.is_row_full(y)).count()
    }

    /// Indices of full rows, top to bottom. Does not mutate.
    pub fn full_rows(&self) -> ArrayVec<usize, HEIGHT> {
        (0..HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Clear all full rows in a single pass and return how many were removed.
    /// Uses a two-pointer copy from the bottom up with zero allocation.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }

        self.cells[..write_y * WIDTH].fill(Cell::Empty);
        cleared
    }

    /// Remove a specific set of rows (as detected at lock time), shifting the
    /// rest down. Indices off the board are ignored.
    pub fn remove_rows(&mut self, rows: &[usize]) -> usize {
        let mut write_y = HEIGHT;
        let mut removed = 0;
        for read_y in (0..HEIGHT).rev() {
            if rows.contains(&read_y) {
                removed += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }
        self.cells[..write_y * WIDTH].fill(Cell::Empty);
        removed
    }

    /// Height of each column's topmost filled cell, 0 for empty columns.
    pub fn surface_profile(&self) -> [u8; WIDTH] {
        let mut heights = [0u8; WIDTH];
        for (x, h) in heights.iter_mut().enumerate() {
            if let Some(y) = (0..HEIGHT).find(|&y| self.cells[y * WIDTH + x].is_filled()) {
                *h = (HEIGHT - y) as u8;
            }
        }
        heights
    }

    /// Empty cells with at least one filled cell above them in the same column.
    pub fn hole_count(&self) -> u32 {
        let mut holes = 0;
        for x in 0..WIDTH {
            let mut covered = false;
            for y in 0..HEIGHT {
                if self.cells[y * WIDTH + x].is_filled() {
                    covered = true;
                } else if covered {
                    holes += 1;
                }
            }
        }
        holes
    }

    pub fn max_height(&self) -> u8 {
        self.surface_profile().into_iter().max().unwrap_or(0)
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Overwrite in place from another board.
    pub fn copy_from(&mut self, other: &Board) {
        self.cells.copy_from_slice(&other.cells);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write the board as a `u8` grid (0 empty, 1 filled).
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * WIDTH + x].as_u8();
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            for cell in self.row(y) {
                f.write_str(if cell.is_filled() { "#" } else { "." })?;
            }
            if y + 1 < HEIGHT {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

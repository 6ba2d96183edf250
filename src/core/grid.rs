//! Grid module - the shared board split between the two players
//!
//! The grid is a `cols x rows` cell array stored flat in row-major order.
//! It is split at `mid = rows / 2`: rows `[mid, rows)` belong to Player 1,
//! rows `[0, mid)` to Player 2. A row only clears when every cell in it is
//! fixed and owned by the clearing player; mixed-ownership rows never clear.
//! Cleared rows compact toward the owner's border so fresh space opens at
//! the centerline.

use crate::types::{Cell, CellState, PieceKind, PlayerId, Tile};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cols: i32,
    rows: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(cols: i32, rows: i32) -> Self {
        let len = (cols as usize) * (rows as usize);
        Self {
            cols,
            rows,
            cells: vec![Cell::EMPTY; len],
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// First row of Player 1's half; Player 2's half ends just above it.
    /// Locking a tile on this row is the loss condition for either player.
    pub fn mid(&self) -> i32 {
        self.rows / 2
    }

    /// Flat index for (x, y), or None when out of bounds
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.cols || y < 0 || y >= self.rows {
            return None;
        }
        Some((y as usize) * (self.cols as usize) + (x as usize))
    }

    /// Cell at (x, y), or None when out of bounds
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// True if any tile is out of bounds, on a wall, or on a fixed cell owned
    /// by `player` itself. An opponent's fixed cells never block: a falling
    /// piece passes over opponent territory.
    pub fn is_blocked(&self, tiles: &[Tile], player: PlayerId) -> bool {
        tiles.iter().any(|&(x, y)| match self.index(x, y) {
            None => true,
            Some(i) => {
                let cell = &self.cells[i];
                match cell.state {
                    CellState::Wall => true,
                    CellState::Fixed => cell.owner == Some(player),
                    CellState::Empty => false,
                }
            }
        })
    }

    /// Stamp every tile as fixed with the given owner, shape and merge level.
    /// Overwrites whatever was there; callers check `is_blocked` first.
    pub fn lock(&mut self, tiles: &[Tile], owner: PlayerId, shape: PieceKind, merge_level: u8) {
        for &(x, y) in tiles {
            if let Some(i) = self.index(x, y) {
                self.cells[i] = Cell::fixed(owner, shape, merge_level);
            }
        }
    }

    /// Reset a single cell to empty (detonation consumes the contact cell).
    pub fn clear_cell(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell::EMPTY;
        }
    }

    /// True when every cell of row `y` is fixed and owned by `owner`
    fn row_full(&self, y: i32, owner: PlayerId) -> bool {
        (0..self.cols).all(|x| match self.cell_at(x, y) {
            Some(cell) => cell.is_fixed() && cell.owner == Some(owner),
            None => false,
        })
    }

    fn copy_row(&mut self, src_y: i32, dst_y: i32) {
        let w = self.cols as usize;
        let src = (src_y as usize) * w;
        let dst = (dst_y as usize) * w;
        self.cells.copy_within(src..src + w, dst);
    }

    fn fill_row_empty(&mut self, y: i32) {
        let w = self.cols as usize;
        let start = (y as usize) * w;
        self.cells[start..start + w].fill(Cell::EMPTY);
    }

    /// Remove `owner`'s full rows from their half and compact the remaining
    /// rows toward their border, refilling vacated centerline rows with empty
    /// cells. Returns the number of rows removed.
    ///
    /// Two-pointer compaction: Player 1's half shifts kept rows down toward
    /// the bottom border, Player 2's half shifts them up toward the top.
    pub fn clear_full_rows(&mut self, owner: PlayerId) -> u32 {
        let mid = self.mid();
        let mut cleared = 0u32;

        match owner {
            PlayerId::One => {
                let mut write_y = self.rows - 1;
                for read_y in (mid..self.rows).rev() {
                    if self.row_full(read_y, owner) {
                        cleared += 1;
                    } else {
                        if write_y != read_y {
                            self.copy_row(read_y, write_y);
                        }
                        write_y -= 1;
                    }
                }
                for y in mid..=write_y {
                    self.fill_row_empty(y);
                }
            }
            PlayerId::Two => {
                let mut write_y = 0;
                for read_y in 0..mid {
                    if self.row_full(read_y, owner) {
                        cleared += 1;
                    } else {
                        if write_y != read_y {
                            self.copy_row(read_y, write_y);
                        }
                        write_y += 1;
                    }
                }
                for y in write_y..mid {
                    self.fill_row_empty(y);
                }
            }
        }

        cleared
    }

    /// Reset every cell to empty (match restart).
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }
}

//! In-memory character grid.
//!
//! The fixed 40x25 cell matrix the display model paints into. The grid is
//! the seam between the pure display code and ratatui: `petirc_app` writes
//! cells through the [`Screen`] trait, `ui` reads them back out.

use petirc_app::display::{COLS, ROWS};
use petirc_app::{Attr, Screen};

/// One grid cell: a character and its color attribute.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    /// Character to display.
    pub ch: char,
    /// Packed color attribute.
    pub attr: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', attr: Attr::new(0, 7) }
    }
}

/// The full 40x25 character grid.
#[derive(Debug)]
pub struct CharGrid {
    cells: Vec<Cell>,
}

impl Default for CharGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CharGrid {
    /// Create a blank grid.
    pub fn new() -> Self {
        Self { cells: vec![Cell::default(); ROWS * COLS] }
    }

    /// Cell at `(row, col)`, or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        self.cells.get(row * COLS + col).copied()
    }

    /// Plain text of one row with trailing blanks trimmed. Test helper,
    /// also used for crash-time screen dumps.
    pub fn row_text(&self, row: usize) -> String {
        if row >= ROWS {
            return String::new();
        }
        let text: String =
            self.cells[row * COLS..(row + 1) * COLS].iter().map(|cell| cell.ch).collect();
        text.trim_end().to_string()
    }
}

impl Screen for CharGrid {
    fn put(&mut self, row: usize, col: usize, ch: char, attr: Attr) {
        if row >= ROWS || col >= COLS {
            return;
        }
        if let Some(cell) = self.cells.get_mut(row * COLS + col) {
            *cell = Cell { ch, attr };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_read_back() {
        let mut grid = CharGrid::new();
        grid.put(3, 5, 'x', Attr::new(1, 2));

        let cell = grid.cell(3, 5).unwrap();
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.attr, Attr::new(1, 2));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = CharGrid::new();
        grid.put(ROWS, 0, 'x', Attr::new(0, 7));
        grid.put(0, COLS, 'x', Attr::new(0, 7));

        assert!(grid.cell(ROWS, 0).is_none());
        assert_eq!(grid.row_text(0), "");
    }

    #[test]
    fn row_text_trims_trailing_blanks() {
        let mut grid = CharGrid::new();
        grid.put(1, 0, 'h', Attr::new(0, 7));
        grid.put(1, 1, 'i', Attr::new(0, 7));

        assert_eq!(grid.row_text(1), "hi");
    }
}

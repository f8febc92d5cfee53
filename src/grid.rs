//! Committed crossword grid types.
//!
//! A [`Grid`] is the immutable, caller-owned result of a generation request:
//! a rectangular array of [`Cell`]s that are either blocked or hold one
//! uppercase letter. The mutable search-time counterpart lives in
//! [`crate::board`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::prepare::WordId;

/// Character used for blocked cells in text output and in the neutral wire format.
pub const BLOCKED_CHAR: char = '.';

/// Orientation of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Row/column step taken when walking along a word in this direction.
    pub fn delta(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Zero-indexed (row, col) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The position `steps` cells further along `direction`.
    pub fn step(self, direction: Direction, steps: usize) -> Self {
        let (dr, dc) = direction.delta();
        Self { row: self.row + dr * steps, col: self.col + dc * steps }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A word committed to a grid: which word, where it starts, and which way it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub word_id: WordId,
    pub start: Position,
    pub direction: Direction,
    pub length: usize,
}

impl Placement {
    /// Position of the `i`-th letter of the placed word.
    pub fn cell(&self, i: usize) -> Position {
        debug_assert!(i < self.length, "letter index {i} out of range for length {}", self.length);
        self.start.step(self.direction, i)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).map(|i| self.cell(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Blocked,
    Letter(char),
}

impl Cell {
    pub fn is_letter(self) -> bool {
        matches!(self, Cell::Letter(_))
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(c) => Some(c),
            Cell::Blocked => None,
        }
    }
}

/// Rectangular, row-major array of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A `rows × cols` grid with every cell blocked.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![Cell::Blocked; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn letter(&self, row: usize, col: usize) -> Option<char> {
        self.get(row, col).and_then(Cell::letter)
    }

    pub fn is_letter(&self, row: usize, col: usize) -> bool {
        self.letter(row, col).is_some()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        debug_assert!(row < self.rows && col < self.cols, "({row}, {col}) outside {}x{} grid", self.rows, self.cols);
        self.cells[row * self.cols + col] = cell;
    }

    /// Iterate over the grid one row slice at a time.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics; a zero-width grid has no cells anyway
        self.cells.chunks(self.cols.max(1))
    }

    pub fn letter_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_letter()).count()
    }

    /// Read `length` letters starting at `start` along `direction`.
    ///
    /// Returns `None` if the run leaves the grid or crosses a blocked cell.
    pub fn word_at(&self, start: Position, direction: Direction, length: usize) -> Option<String> {
        (0..length)
            .map(|i| {
                let p = start.step(direction, i);
                self.letter(p.row, p.col)
            })
            .collect()
    }

    /// The cell paired with `pos` under a 180° rotation about the grid center.
    pub fn mirror(&self, pos: Position) -> Position {
        Position { row: self.rows - 1 - pos.row, col: self.cols - 1 - pos.col }
    }

    /// Letter cells whose rotational partner is blocked.
    ///
    /// Empty iff the blocked-cell mask is symmetric under 180° rotation.
    pub fn asymmetric_cells(&self) -> Vec<Position> {
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let m = self.mirror(pos);
                if self.is_letter(row, col) && !self.is_letter(m.row, m.col) {
                    out.push(pos);
                }
            }
        }
        out
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_cells().is_empty()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.letter().unwrap_or(BLOCKED_CHAR))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(lines: &[&str]) -> Grid {
        let mut g = Grid::new(lines.len(), lines[0].len());
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch != BLOCKED_CHAR {
                    g.set(r, c, Cell::Letter(ch));
                }
            }
        }
        g
    }

    #[test]
    fn test_new_grid_is_all_blocked() {
        let g = Grid::new(3, 4);
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 4);
        assert_eq!(g.letter_count(), 0);
        assert_eq!(g.get(2, 3), Some(Cell::Blocked));
        assert_eq!(g.get(3, 0), None);
    }

    #[test]
    fn test_word_at_reads_both_directions() {
        let g = grid_from(&["LOOP", "A...", "T...", "E..."]);
        assert_eq!(g.word_at(Position::new(0, 0), Direction::Across, 4).as_deref(), Some("LOOP"));
        assert_eq!(g.word_at(Position::new(0, 0), Direction::Down, 4).as_deref(), Some("LATE"));
        assert_eq!(g.word_at(Position::new(1, 0), Direction::Across, 2), None);
        assert_eq!(g.word_at(Position::new(0, 2), Direction::Across, 4), None);
    }

    #[test]
    fn test_symmetric_mask() {
        let g = grid_from(&["AB.", ".C.", ".DE"]);
        assert!(g.is_symmetric());
    }

    #[test]
    fn test_asymmetric_cells_reports_letter_side() {
        let g = grid_from(&["AB.", "...", "..."]);
        assert_eq!(g.asymmetric_cells(), vec![Position::new(0, 0), Position::new(0, 1)]);
        assert!(!g.is_symmetric());
    }

    #[test]
    fn test_display_uses_blocked_char() {
        let g = grid_from(&["AB", ".C"]);
        assert_eq!(g.to_string(), "AB\n.C");
    }

    #[test]
    fn test_placement_cells() {
        let p = Placement { word_id: 0, start: Position::new(1, 2), direction: Direction::Down, length: 3 };
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(cells, vec![Position::new(1, 2), Position::new(2, 2), Position::new(3, 2)]);
    }

    #[test]
    fn test_direction_perpendicular() {
        assert_eq!(Direction::Across.perpendicular(), Direction::Down);
        assert_eq!(Direction::Down.perpendicular(), Direction::Across);
        assert_eq!(Direction::Down.to_string(), "down");
    }
}

//! Neutral puzzle structure handed to renderers, and its JSON form.
//!
//! The structure is plain data: title, size, a matrix of one-character cells and the
//! across/down clue lists. Renderers (image, print, browser) consume it without
//! knowing anything about the search.

use serde::{Deserialize, Serialize};

use crate::errors::DataError;
use crate::grid::{Cell, Direction, Grid, BLOCKED_CHAR};
use crate::numbering::Slot;
use crate::puzzle::Puzzle;

/// Character for an open (unfilled) cell in the student variant.
pub const OPEN_CHAR: char = '_';

/// Which audience the structure is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Letters hidden; open cells shown as `'_'`.
    Student,
    /// Letters shown.
    #[default]
    AnswerKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

/// One clue as seen by a renderer. `number` is 1-based, `row`/`col` are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    pub number: usize,
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub answer: String,
    /// Empty when no clue was supplied.
    pub clue: String,
}

impl From<&Slot> for ClueEntry {
    fn from(slot: &Slot) -> Self {
        Self {
            number: slot.number,
            row: slot.row,
            col: slot.col,
            length: slot.length,
            answer: slot.answer.clone(),
            clue: slot.clue.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueLists {
    pub across: Vec<ClueEntry>,
    pub down: Vec<ClueEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    pub title: String,
    pub variant: Variant,
    pub size: GridSize,
    pub grid: Vec<Vec<char>>,
    pub clues: ClueLists,
}

impl PuzzleData {
    pub fn from_puzzle(puzzle: &Puzzle, variant: Variant) -> Self {
        let grid = puzzle
            .grid
            .iter_rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match (cell, variant) {
                        (Cell::Blocked, _) => BLOCKED_CHAR,
                        (Cell::Letter(_), Variant::Student) => OPEN_CHAR,
                        (Cell::Letter(c), Variant::AnswerKey) => *c,
                    })
                    .collect()
            })
            .collect();

        let mut clues = ClueLists::default();
        for slot in &puzzle.slots {
            match slot.direction {
                Direction::Across => clues.across.push(ClueEntry::from(slot)),
                Direction::Down => clues.down.push(ClueEntry::from(slot)),
            }
        }

        Self {
            title: puzzle.title.clone(),
            variant,
            size: GridSize { rows: puzzle.grid.rows(), cols: puzzle.grid.cols() },
            grid,
            clues,
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`DataError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild the committed grid.
    ///
    /// The answer key is read straight from the matrix. The student variant only marks
    /// open cells, so letters are restored from the clue answers.
    ///
    /// # Errors
    ///
    /// Returns a [`DataError`] if the matrix is not rectangular, does not match `size`,
    /// contains unknown characters, or the answers do not fit it.
    pub fn to_grid(&self) -> Result<Grid, DataError> {
        let GridSize { rows, cols } = self.size;
        if self.grid.len() != rows {
            return Err(DataError::SizeMismatch { rows, cols, found_rows: self.grid.len() });
        }

        let mut grid = Grid::new(rows, cols);
        let mut open = vec![false; rows * cols];
        for (r, line) in self.grid.iter().enumerate() {
            if line.len() != cols {
                return Err(DataError::RaggedGrid { row: r, expected: cols, found: line.len() });
            }
            for (c, &ch) in line.iter().enumerate() {
                match (ch, self.variant) {
                    (BLOCKED_CHAR, _) => {}
                    (OPEN_CHAR, Variant::Student) => open[r * cols + c] = true,
                    (ch, Variant::AnswerKey) if ch.is_ascii_uppercase() => grid.set(r, c, Cell::Letter(ch)),
                    (ch, _) => return Err(DataError::UnknownCell { ch, row: r, col: c }),
                }
            }
        }

        if self.variant == Variant::AnswerKey {
            return Ok(grid);
        }

        let lists = [(Direction::Across, &self.clues.across), (Direction::Down, &self.clues.down)];
        for (direction, entries) in lists {
            for entry in entries {
                let (dr, dc) = direction.delta();
                let out_of_bounds = DataError::AnswerOutOfBounds { number: entry.number, direction };
                if entry.answer.chars().count() != entry.length {
                    return Err(out_of_bounds);
                }
                for (i, ch) in entry.answer.chars().enumerate() {
                    let (r, c) = (entry.row + dr * i, entry.col + dc * i);
                    if r >= rows || c >= cols {
                        return Err(out_of_bounds);
                    }
                    let agrees = grid.letter(r, c).map_or(true, |l| l == ch);
                    if !open[r * cols + c] || !agrees || !ch.is_ascii_uppercase() {
                        return Err(DataError::ConflictingAnswer { row: r, col: c });
                    }
                    grid.set(r, c, Cell::Letter(ch));
                }
            }
        }

        // every open cell belongs to some answer
        if let Some(i) = (0..rows * cols).find(|&i| open[i] && !grid.is_letter(i / cols, i % cols)) {
            return Err(DataError::UnknownCell { ch: OPEN_CHAR, row: i / cols, col: i % cols });
        }
        Ok(grid)
    }
}

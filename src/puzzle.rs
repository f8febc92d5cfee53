//! The finished puzzle returned to the caller.

use crate::errors::Warning;
use crate::grid::{Direction, Grid, Placement};
use crate::numbering::Slot;
use crate::serialize::{PuzzleData, Variant};
use crate::validate::components;

/// Counters describing how the puzzle was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Side of the square board the kept attempt ran on (before trimming).
    pub grid_side: usize,
    /// Candidate evaluations spent across all attempts.
    pub attempts: usize,
    /// Number of times the board was enlarged.
    pub resizes: usize,
    pub placed: usize,
    pub dropped: usize,
}

/// A generated crossword. Immutable once returned; the engine keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub title: String,
    pub grid: Grid,
    /// Numbered slots, ordered by number (across before down at a shared number).
    pub slots: Vec<Slot>,
    /// Placed words in grid coordinates.
    pub placements: Vec<Placement>,
    pub warnings: Vec<Warning>,
    /// The blocked-cell mask is not 180° symmetric.
    pub symmetry_relaxed: bool,
    /// The attempt budget ran out; the puzzle holds what was placed by then.
    pub budget_exhausted: bool,
    pub stats: SearchStats,
}

impl Puzzle {
    pub fn to_data(&self, variant: Variant) -> PuzzleData {
        PuzzleData::from_puzzle(self, variant)
    }

    pub fn across(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.direction == Direction::Across)
    }

    pub fn down(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.direction == Direction::Down)
    }

    /// Answers of the placed words, in placement order.
    pub fn words(&self) -> Vec<String> {
        self.placements
            .iter()
            .filter_map(|p| self.grid.word_at(p.start, p.direction, p.length))
            .collect()
    }

    /// Cells shared by an across and a down word.
    pub fn intersections(&self) -> usize {
        let mut across = vec![false; self.grid.rows() * self.grid.cols()];
        for p in self.placements.iter().filter(|p| p.direction == Direction::Across) {
            for pos in p.cells() {
                across[pos.row * self.grid.cols() + pos.col] = true;
            }
        }
        self.placements
            .iter()
            .filter(|p| p.direction == Direction::Down)
            .flat_map(Placement::cells)
            .filter(|pos| across[pos.row * self.grid.cols() + pos.col])
            .count()
    }

    /// All placed words form one group linked through shared cells.
    pub fn is_connected(&self) -> bool {
        components(&self.placements).len() <= 1
    }
}

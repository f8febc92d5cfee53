//! Mutable working grid used during placement search.
//!
//! The board keeps flat per-cell arrays (letter and across/down claims) plus the list
//! of active placements. Every mutation made while a checkpoint is open is recorded in
//! an undo log, so a tentative placement can be applied, checked and rewound without
//! copying the board.

use std::cmp::{max, min};

use crate::config::AdjacencyPolicy;
use crate::grid::{Cell, Direction, Grid, Placement, Position};
use crate::prepare::WordId;

/// Which words occupy a cell, per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Claims {
    across: Option<WordId>,
    down: Option<WordId>,
}

impl Claims {
    fn get(self, direction: Direction) -> Option<WordId> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }

    fn set(&mut self, direction: Direction, word: Option<WordId>) {
        match direction {
            Direction::Across => self.across = word,
            Direction::Down => self.down = word,
        }
    }
}

/// A recorded mutation; each variant holds what is needed to undo it.
#[derive(Debug, Clone, Copy)]
enum Change {
    Cell { index: usize, letter: Option<u8>, claims: Claims },
    Placed,
    Removed { index: usize, placement: Placement },
}

#[derive(Debug, Default)]
struct UndoLog {
    changes: Vec<Change>,
    checkpoints: Vec<usize>,
}

impl UndoLog {
    fn record(&mut self, change: Change) {
        if !self.checkpoints.is_empty() {
            self.changes.push(change);
        }
    }
}

/// Why a candidate placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutOfBounds,
    /// A cell on the run holds a different letter.
    Conflict,
    /// Every cell is already filled; the word would add nothing.
    NoNewCell,
    /// The cell before the start or after the end holds a letter.
    Abutting,
    /// A cell is already claimed by a word running the same way.
    SameDirection,
    /// A new letter would lengthen or merge with a perpendicular placed word.
    ExtendsWord,
    /// A new letter would form an unintended perpendicular run.
    Fragment,
}

/// Result of a successful [`Board::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    /// Cells that already hold the matching letter.
    pub crossings: usize,
    pub new_cells: usize,
}

/// Inclusive bounding box of the letter cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Bounds {
    pub fn of(placement: &Placement) -> Self {
        let end = placement.cell(placement.length - 1);
        Self { top: placement.start.row, left: placement.start.col, bottom: end.row, right: end.col }
    }

    pub fn union(self, other: Bounds) -> Self {
        Self {
            top: min(self.top, other.top),
            left: min(self.left, other.left),
            bottom: max(self.bottom, other.bottom),
            right: max(self.right, other.right),
        }
    }

    pub fn area(self) -> usize {
        (self.bottom - self.top + 1) * (self.right - self.left + 1)
    }

    pub fn window(self) -> Window {
        Window {
            top: self.top,
            left: self.left,
            rows: self.bottom - self.top + 1,
            cols: self.right - self.left + 1,
        }
    }
}

/// Rectangular view of the board, used to crop the committed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    letters: Vec<Option<u8>>,
    claims: Vec<Claims>,
    placements: Vec<Placement>,
    log: UndoLog,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            letters: vec![None; rows * cols],
            claims: vec![Claims::default(); rows * cols],
            placements: Vec::new(),
            log: UndoLog::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement_of(&self, word: WordId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.word_id == word)
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Letter at `(row, col)`; off-board coordinates read as empty.
    pub fn letter(&self, row: isize, col: isize) -> Option<u8> {
        let (r, c) = (usize::try_from(row).ok()?, usize::try_from(col).ok()?);
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.letters[r * self.cols + c]
    }

    pub fn letter_at(&self, pos: Position) -> Option<u8> {
        self.letters[self.index(pos)]
    }

    /// Word claiming `pos` in `direction`, if any.
    pub fn claim(&self, pos: Position, direction: Direction) -> Option<WordId> {
        self.claims[self.index(pos)].get(direction)
    }

    /// Check whether `text` can go at `(row, col)` in `direction` on the current board.
    ///
    /// Covers bounds, letter agreement, same-direction claims and the empty cells that
    /// must bracket a word. Perpendicular adjacency is checked after applying, by
    /// [`Board::check_neighbors`].
    pub fn fit(&self, text: &[u8], row: isize, col: isize, direction: Direction) -> Result<Fit, Rejection> {
        let len = text.len() as isize;
        let (dr, dc) = direction.delta();
        let (dr, dc) = (dr as isize, dc as isize);
        let (end_row, end_col) = (row + dr * (len - 1), col + dc * (len - 1));
        if row < 0 || col < 0 || end_row >= self.rows as isize || end_col >= self.cols as isize {
            return Err(Rejection::OutOfBounds);
        }
        if self.letter(row - dr, col - dc).is_some() || self.letter(end_row + dr, end_col + dc).is_some() {
            return Err(Rejection::Abutting);
        }

        let start = Position::new(row as usize, col as usize);
        let mut crossings = 0;
        let mut new_cells = 0;
        for (i, &ch) in text.iter().enumerate() {
            let idx = self.index(start.step(direction, i));
            match self.letters[idx] {
                Some(existing) if existing != ch => return Err(Rejection::Conflict),
                Some(_) => {
                    if self.claims[idx].get(direction).is_some() {
                        return Err(Rejection::SameDirection);
                    }
                    crossings += 1;
                }
                None => new_cells += 1,
            }
        }
        if new_cells == 0 {
            return Err(Rejection::NoNewCell);
        }
        Ok(Fit { crossings, new_cells })
    }

    /// Write `text` onto the board and record the placement.
    ///
    /// Returns the positions that were empty before. The caller must have checked
    /// the placement with [`Board::fit`].
    pub fn apply(&mut self, word: WordId, text: &[u8], start: Position, direction: Direction) -> Vec<Position> {
        let placement = Placement { word_id: word, start, direction, length: text.len() };
        let mut fresh = Vec::new();
        for (i, &ch) in text.iter().enumerate() {
            let pos = placement.cell(i);
            let idx = self.index(pos);
            debug_assert!(
                self.letters[idx].map_or(true, |l| l == ch),
                "letter conflict at {pos} placing word {word}"
            );
            self.log.record(Change::Cell { index: idx, letter: self.letters[idx], claims: self.claims[idx] });
            if self.letters[idx].is_none() {
                fresh.push(pos);
            }
            self.letters[idx] = Some(ch);
            self.claims[idx].set(direction, Some(word));
        }
        self.placements.push(placement);
        self.log.record(Change::Placed);
        fresh
    }

    /// Check the perpendicular runs through freshly written cells of a word placed
    /// in `direction`.
    pub fn check_neighbors(
        &self,
        fresh: &[Position],
        direction: Direction,
        policy: AdjacencyPolicy,
    ) -> Result<(), Rejection> {
        let across = direction.perpendicular();
        for &pos in fresh {
            let run = self.run_through(pos, across);
            if run.len() < 2 {
                continue;
            }
            if run.iter().any(|&p| self.claim(p, across).is_some()) {
                return Err(Rejection::ExtendsWord);
            }
            let too_close = match policy {
                AdjacencyPolicy::Strict => true,
                AdjacencyPolicy::Lenient => run.len() <= 3,
            };
            if too_close {
                return Err(Rejection::Fragment);
            }
        }
        Ok(())
    }

    /// The maximal run of letter cells through `pos` along `direction`.
    pub fn run_through(&self, pos: Position, direction: Direction) -> Vec<Position> {
        let (dr, dc) = direction.delta();
        let mut start = pos;
        while start.row >= dr && start.col >= dc {
            let prev = Position::new(start.row - dr, start.col - dc);
            if self.letter_at(prev).is_none() {
                break;
            }
            start = prev;
        }
        let mut run = Vec::new();
        let mut cur = start;
        while cur.row < self.rows && cur.col < self.cols && self.letter_at(cur).is_some() {
            run.push(cur);
            cur = cur.step(direction, 1);
        }
        run
    }

    /// Take a word off the board. Cells still claimed by a crossing word keep their letter.
    pub fn remove_word(&mut self, word: WordId) -> Option<Placement> {
        let index = self.placements.iter().position(|p| p.word_id == word)?;
        let placement = self.placements.remove(index);
        self.log.record(Change::Removed { index, placement });
        for pos in placement.cells() {
            let idx = self.index(pos);
            self.log.record(Change::Cell { index: idx, letter: self.letters[idx], claims: self.claims[idx] });
            self.claims[idx].set(placement.direction, None);
            if self.claims[idx].get(placement.direction.perpendicular()).is_none() {
                self.letters[idx] = None;
            }
        }
        Some(placement)
    }

    /// Words sharing a cell with `placement`.
    pub fn crossing_words(&self, placement: &Placement) -> Vec<WordId> {
        let other = placement.direction.perpendicular();
        placement.cells().filter_map(|pos| self.claim(pos, other)).collect()
    }

    pub fn checkpoint(&mut self) {
        self.log.checkpoints.push(self.log.changes.len());
    }

    /// Undo everything since the most recent checkpoint and discard it.
    pub fn rewind(&mut self) {
        let Some(mark) = self.log.checkpoints.pop() else {
            return;
        };
        while self.log.changes.len() > mark {
            match self.log.changes.pop() {
                Some(Change::Cell { index, letter, claims }) => {
                    self.letters[index] = letter;
                    self.claims[index] = claims;
                }
                Some(Change::Placed) => {
                    self.placements.pop();
                }
                Some(Change::Removed { index, placement }) => self.placements.insert(index, placement),
                None => break,
            }
        }
    }

    /// Keep everything since the most recent checkpoint and discard it.
    pub fn commit(&mut self) {
        self.log.checkpoints.pop();
        if self.log.checkpoints.is_empty() {
            self.log.changes.clear();
        }
    }

    /// Bounding box of all letters, or `None` on an empty board.
    pub fn bounds(&self) -> Option<Bounds> {
        self.placements.iter().map(Bounds::of).reduce(Bounds::union)
    }

    pub fn full_window(&self) -> Window {
        Window { top: 0, left: 0, rows: self.rows, cols: self.cols }
    }

    /// Copy the letters inside `window` into a committed [`Grid`].
    pub fn to_grid(&self, window: Window) -> Grid {
        let mut grid = Grid::new(window.rows, window.cols);
        for row in 0..window.rows {
            for col in 0..window.cols {
                if let Some(l) = self.letter_at(Position::new(window.top + row, window.left + col)) {
                    grid.set(row, col, Cell::Letter(char::from(l)));
                }
            }
        }
        grid
    }

    /// Active placements with coordinates relative to `window`, in placement order.
    pub fn placements_in(&self, window: Window) -> Vec<Placement> {
        self.placements
            .iter()
            .map(|p| Placement {
                start: Position::new(p.start.row - window.top, p.start.col - window.left),
                ..*p
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, word: WordId, text: &str, row: usize, col: usize, dir: Direction) {
        board.fit(text.as_bytes(), row as isize, col as isize, dir).unwrap();
        board.apply(word, text.as_bytes(), Position::new(row, col), dir);
    }

    #[test]
    fn test_apply_and_read_back() {
        let mut board = Board::new(7, 7);
        place(&mut board, 0, "PYTHON", 3, 0, Direction::Across);
        let fit = board.fit(b"TYPE", 3, 2, Direction::Down).unwrap();
        assert_eq!(fit, Fit { crossings: 1, new_cells: 3 });
        let fresh = board.apply(1, b"TYPE", Position::new(3, 2), Direction::Down);
        assert_eq!(fresh, vec![Position::new(4, 2), Position::new(5, 2), Position::new(6, 2)]);
        assert_eq!(board.claim(Position::new(3, 2), Direction::Across), Some(0));
        assert_eq!(board.claim(Position::new(3, 2), Direction::Down), Some(1));
        assert_eq!(board.crossing_words(&board.placements()[1]), vec![0]);
        assert_eq!(board.to_grid(board.full_window()).to_string().lines().nth(3), Some("PYTHON."));
    }

    #[test]
    fn test_rewind_restores_state() {
        let mut board = Board::new(7, 7);
        place(&mut board, 0, "PYTHON", 3, 0, Direction::Across);
        let before = board.to_grid(board.full_window());

        board.checkpoint();
        board.apply(1, b"TYPE", Position::new(3, 2), Direction::Down);
        assert_eq!(board.placements().len(), 2);
        board.rewind();

        assert_eq!(board.placements().len(), 1);
        assert_eq!(board.to_grid(board.full_window()), before);
        assert_eq!(board.claim(Position::new(3, 2), Direction::Down), None);
    }

    #[test]
    fn test_commit_keeps_state() {
        let mut board = Board::new(7, 7);
        place(&mut board, 0, "PYTHON", 3, 0, Direction::Across);
        board.checkpoint();
        board.apply(1, b"TYPE", Position::new(3, 2), Direction::Down);
        board.commit();
        board.rewind(); // no open checkpoint: nothing happens
        assert_eq!(board.placements().len(), 2);
        assert_eq!(board.letter(6, 2), Some(b'E'));
    }

    #[test]
    fn test_remove_word_keeps_shared_letters() {
        let mut board = Board::new(7, 7);
        place(&mut board, 0, "PYTHON", 3, 0, Direction::Across);
        place(&mut board, 1, "TYPE", 3, 2, Direction::Down);
        let removed = board.remove_word(1).unwrap();
        assert_eq!(removed.direction, Direction::Down);
        assert_eq!(board.letter(3, 2), Some(b'T'));
        assert_eq!(board.letter(4, 2), None);
        assert!(board.remove_word(1).is_none());
    }

    #[test]
    fn test_remove_rewinds() {
        let mut board = Board::new(7, 7);
        place(&mut board, 0, "PYTHON", 3, 0, Direction::Across);
        place(&mut board, 1, "TYPE", 3, 2, Direction::Down);
        board.checkpoint();
        board.remove_word(0);
        assert_eq!(board.letter(3, 0), None);
        board.rewind();
        assert_eq!(board.letter(3, 0), Some(b'P'));
        let ids: Vec<_> = board.placements().iter().map(|p| p.word_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_bounds_and_window() {
        let mut board = Board::new(9, 9);
        place(&mut board, 0, "PYTHON", 4, 1, Direction::Across);
        place(&mut board, 1, "TYPE", 4, 3, Direction::Down);
        let bounds = board.bounds().unwrap();
        assert_eq!(bounds, Bounds { top: 4, left: 1, bottom: 7, right: 6 });
        assert_eq!(bounds.area(), 24);
        let window = bounds.window();
        let grid = board.to_grid(window);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 6);
        let moved = board.placements_in(window);
        assert_eq!(moved[1].start, Position::new(0, 2));
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn test_out_of_bounds() {
            let board = Board::new(5, 5);
            assert_eq!(board.fit(b"LOOP", -1, 0, Direction::Down), Err(Rejection::OutOfBounds));
            assert_eq!(board.fit(b"LOOP", 0, 2, Direction::Across), Err(Rejection::OutOfBounds));
            assert!(board.fit(b"LOOP", 0, 1, Direction::Across).is_ok());
        }

        #[test]
        fn test_abutting_and_same_direction() {
            let mut board = Board::new(9, 9);
            place(&mut board, 0, "LOOP", 4, 0, Direction::Across);
            // would touch the P of LOOP end-to-end
            assert_eq!(board.fit(b"TYPE", 4, 4, Direction::Across), Err(Rejection::Abutting));
            // lies on top of LOOP in the same direction
            assert_eq!(board.fit(b"OOPS", 4, 1, Direction::Across), Err(Rejection::Abutting));
            assert_eq!(board.fit(b"LOOP", 4, 0, Direction::Across), Err(Rejection::SameDirection));
        }

        #[test]
        fn test_same_direction_claim() {
            let mut board = Board::new(9, 9);
            place(&mut board, 0, "LOOP", 4, 1, Direction::Across);
            place(&mut board, 1, "POOL", 4, 4, Direction::Down);
            // POOL already claims these cells downwards
            assert_eq!(board.fit(b"PEAR", 4, 4, Direction::Down), Err(Rejection::SameDirection));
        }

        #[test]
        fn test_lenient_rejects_short_fragment() {
            let mut board = Board::new(9, 9);
            place(&mut board, 0, "LOOP", 4, 0, Direction::Across);
            // a parallel across word directly below forms two-letter down runs
            board.checkpoint();
            let fresh = board.apply(1, b"TYPE", Position::new(5, 1), Direction::Across);
            assert_eq!(
                board.check_neighbors(&fresh, Direction::Across, AdjacencyPolicy::Lenient),
                Err(Rejection::Fragment)
            );
            board.rewind();
        }

        #[test]
        fn test_extending_perpendicular_word_rejected() {
            let mut board = Board::new(9, 9);
            place(&mut board, 0, "LOOP", 0, 2, Direction::Down);
            // an across word whose new letter sits right under the P of LOOP
            board.checkpoint();
            let fresh = board.apply(1, b"TYPE", Position::new(4, 0), Direction::Across);
            assert_eq!(
                board.check_neighbors(&fresh, Direction::Across, AdjacencyPolicy::Lenient),
                Err(Rejection::ExtendsWord)
            );
            board.rewind();
        }

        #[test]
        fn test_strict_vs_lenient_long_run() {
            // Two down words, then an across word whose new letter completes a
            // four-letter unintended across run: lenient allows it, strict does not.
            let mut board = Board::new(9, 9);
            place(&mut board, 0, "ABCD", 0, 0, Direction::Down);
            place(&mut board, 1, "EFGH", 0, 1, Direction::Down);
            place(&mut board, 2, "IJKL", 0, 2, Direction::Down);
            board.checkpoint();
            let fresh = board.apply(3, b"MNOP", Position::new(0, 3), Direction::Down);
            assert_eq!(
                board.check_neighbors(&fresh, Direction::Down, AdjacencyPolicy::Lenient),
                Ok(())
            );
            assert_eq!(
                board.check_neighbors(&fresh, Direction::Down, AdjacencyPolicy::Strict),
                Err(Rejection::Fragment)
            );
            board.rewind();
        }

        #[test]
        fn test_run_through() {
            let mut board = Board::new(5, 5);
            place(&mut board, 0, "LOOP", 1, 0, Direction::Across);
            let run = board.run_through(Position::new(1, 2), Direction::Across);
            assert_eq!(run.len(), 4);
            assert_eq!(board.run_through(Position::new(1, 2), Direction::Down).len(), 1);
        }
    }
}

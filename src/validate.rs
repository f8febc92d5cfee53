//! Connectivity and symmetry checks run after the search.
//!
//! Neither check raises: a cut-off group of words is re-attached or dropped, and an
//! asymmetric blocked-cell mask is reported rather than forced.

use std::collections::HashMap;

use log::{debug, info};

use crate::board::{Board, Window};
use crate::config::AdjacencyPolicy;
use crate::grid::{Grid, Placement, Position};
use crate::prepare::{Word, WordId};
use crate::search::{search_order, AttemptBudget, PlacementSearch};

/// Union-find over placement indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Groups of words connected through shared cells.
///
/// Each group is sorted by word id; groups are ordered by their lowest id.
pub fn components(placements: &[Placement]) -> Vec<Vec<WordId>> {
    let mut set = DisjointSet::new(placements.len());
    let mut first_at: HashMap<Position, usize> = HashMap::new();
    for (i, p) in placements.iter().enumerate() {
        for pos in p.cells() {
            if let Some(&j) = first_at.get(&pos) {
                set.union(i, j);
            } else {
                first_at.insert(pos, i);
            }
        }
    }

    let mut groups: HashMap<usize, Vec<WordId>> = HashMap::new();
    for (i, p) in placements.iter().enumerate() {
        groups.entry(set.find(i)).or_default().push(p.word_id);
    }
    let mut out: Vec<Vec<WordId>> = groups.into_values().collect();
    for group in &mut out {
        group.sort_unstable();
    }
    out.sort();
    out
}

/// Result of [`reconnect`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconnection {
    /// Words moved back into the main group.
    pub reattached: Vec<WordId>,
    /// Words that could not be re-attached, in search order.
    pub dropped: Vec<WordId>,
    pub exhausted: bool,
}

/// Keep the largest group of connected words and try to re-attach the rest.
///
/// Ties on size go to the group containing `seed`, then to the lowest word id.
/// Cut-off words are taken off the board and get a single placement pass against the
/// main group, sharing the request's attempt budget.
pub fn reconnect(
    words: &[Word],
    board: Board,
    seed: WordId,
    policy: AdjacencyPolicy,
    budget: &mut AttemptBudget,
) -> (Board, Reconnection) {
    let groups = components(board.placements());
    if groups.len() <= 1 {
        return (board, Reconnection::default());
    }

    let keep = groups
        .iter()
        .enumerate()
        .max_by_key(|&(i, g)| (g.len(), g.contains(&seed), std::cmp::Reverse(i)))
        .map_or(0, |(i, _)| i);

    let mut board = board;
    let mut cut: Vec<WordId> = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if i != keep {
            cut.extend(group);
        }
    }
    for &word in &cut {
        board.remove_word(word);
    }
    info!("{} words cut off from the main group; re-attaching", cut.len());

    // re-attach in the usual search order
    let queue: Vec<WordId> = search_order(words).into_iter().filter(|w| cut.contains(w)).collect();
    let mut search = PlacementSearch::with_board(words, board, policy);
    let report = search.run(&queue, false, budget);
    debug!("re-attached {} of {}", report.placed.len(), queue.len());

    (
        search.into_board(),
        Reconnection { reattached: report.placed, dropped: report.unplaced, exhausted: report.exhausted },
    )
}

/// Frame and symmetry verdict chosen by [`settle_symmetry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryReport {
    pub window: Window,
    pub grid: Grid,
    /// Letter cells whose 180° partner is blocked; empty when symmetric.
    pub asymmetric_cells: Vec<Position>,
}

impl SymmetryReport {
    pub fn relaxed(&self) -> bool {
        !self.asymmetric_cells.is_empty()
    }
}

/// Pick the grid frame and check its 180° rotational symmetry.
///
/// With `trim` the frame is the letter bounding box. Without it the full board is used
/// unless only the bounding box is symmetric. Placements are never moved.
pub fn settle_symmetry(board: &Board, trim: bool) -> SymmetryReport {
    let trimmed = board.bounds().map_or_else(|| board.full_window(), |b| b.window());
    let report_for = |window: Window| {
        let grid = board.to_grid(window);
        let asymmetric_cells = grid.asymmetric_cells();
        SymmetryReport { window, grid, asymmetric_cells }
    };

    if trim {
        return report_for(trimmed);
    }
    let full = report_for(board.full_window());
    if !full.relaxed() || trimmed == full.window {
        return full;
    }
    let cropped = report_for(trimmed);
    if cropped.relaxed() {
        full
    } else {
        debug!("board is asymmetric but its bounding box is not; cropping");
        cropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clues::Clue;
    use crate::grid::Direction;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Word { id: i, text: (*t).to_string(), clue: Clue::Missing, rank: i })
            .collect()
    }

    fn put(board: &mut Board, ws: &[Word], id: WordId, row: usize, col: usize, dir: Direction) {
        board.apply(id, ws[id].letters(), Position::new(row, col), dir);
    }

    #[test]
    fn test_components_connected() {
        let ws = words(&["PYTHON", "TYPE"]);
        let mut board = Board::new(9, 9);
        put(&mut board, &ws, 0, 4, 1, Direction::Across);
        put(&mut board, &ws, 1, 4, 3, Direction::Down);
        assert_eq!(components(board.placements()), vec![vec![0, 1]]);
    }

    #[test]
    fn test_components_split() {
        let ws = words(&["PYTHON", "TYPE", "LOOP"]);
        let mut board = Board::new(11, 11);
        put(&mut board, &ws, 0, 5, 2, Direction::Across);
        put(&mut board, &ws, 1, 5, 4, Direction::Down);
        put(&mut board, &ws, 2, 0, 0, Direction::Across);
        assert_eq!(components(board.placements()), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_reconnect_reattaches_cut_off_word() {
        let ws = words(&["PYTHON", "TYPE", "LOOP"]);
        let mut board = Board::new(11, 11);
        put(&mut board, &ws, 0, 5, 2, Direction::Across);
        put(&mut board, &ws, 1, 5, 4, Direction::Down);
        // LOOP floats in the corner; its O can hang off the O of PYTHON
        put(&mut board, &ws, 2, 0, 0, Direction::Across);

        let mut budget = AttemptBudget::new(100);
        let (board, result) = reconnect(&ws, board, 0, AdjacencyPolicy::Lenient, &mut budget);
        assert_eq!(result.reattached, vec![2]);
        assert!(result.dropped.is_empty());
        assert_eq!(components(board.placements()).len(), 1);
        assert_eq!(board.letter(0, 0), None);
    }

    #[test]
    fn test_reconnect_drops_unattachable_word() {
        let ws = words(&["PYTHON", "TYPE", "ZZZZ"]);
        let mut board = Board::new(11, 11);
        put(&mut board, &ws, 0, 5, 2, Direction::Across);
        put(&mut board, &ws, 1, 5, 4, Direction::Down);
        put(&mut board, &ws, 2, 0, 0, Direction::Across);

        let mut budget = AttemptBudget::new(100);
        let (board, result) = reconnect(&ws, board, 0, AdjacencyPolicy::Lenient, &mut budget);
        assert_eq!(result.dropped, vec![2]);
        assert!(board.placement_of(2).is_none());
        assert_eq!(board.placements().len(), 2);
    }

    #[test]
    fn test_trim_makes_single_word_symmetric() {
        let ws = words(&["LOOP", "POOL"]);
        let mut board = Board::new(7, 7);
        put(&mut board, &ws, 0, 1, 0, Direction::Across);
        let report = settle_symmetry(&board, true);
        assert!(!report.relaxed());
        assert_eq!(report.grid.to_string(), "LOOP");
    }

    #[test]
    fn test_untrimmed_falls_back_to_bounding_box() {
        let ws = words(&["LOOP", "POOL"]);
        let mut board = Board::new(7, 7);
        put(&mut board, &ws, 0, 1, 0, Direction::Across);
        let report = settle_symmetry(&board, false);
        assert!(!report.relaxed());
        assert_eq!(report.window.rows, 1);
    }

    #[test]
    fn test_asymmetric_is_relaxed_not_altered() {
        let ws = words(&["PYTHON", "TYPE"]);
        let mut board = Board::new(9, 9);
        put(&mut board, &ws, 0, 4, 1, Direction::Across);
        put(&mut board, &ws, 1, 4, 3, Direction::Down);
        let report = settle_symmetry(&board, true);
        assert!(report.relaxed());
        assert_eq!(report.grid.letter_count(), 9);
        // full board stays when cropping does not help and trimming is off
        let report = settle_symmetry(&board, false);
        assert!(report.relaxed());
        assert_eq!(report.window, board.full_window());
    }
}

//! Placement search: attach words to the board one at a time, best candidate first.
//!
//! The search is driven by an explicit work stack. Each frame holds one word, its
//! ranked candidates and a cursor into them. A placed word keeps its frame (and its
//! undo checkpoint) on the stack, so a later dead end can rewind it and move its cursor
//! on. Backtracking is ordered by discrepancies: the first pass follows the best
//! candidate everywhere, the next allows one frame to deviate, and so on. The attempt
//! budget is checked in exactly one place, at the top of the loop, and the best set of
//! placements seen so far is what the search returns.

use std::cmp::Reverse;

use log::{debug, trace};

use crate::board::{Board, Bounds, Rejection};
use crate::config::AdjacencyPolicy;
use crate::grid::{Direction, Placement, Position};
use crate::prepare::{Word, WordId};

/// Caps the number of candidate evaluations for a whole request.
///
/// Usage:
/// ```ignore
///  let mut budget = AttemptBudget::new(1_000);
///  while !budget.expired() {
///    budget.spend();
///    // evaluate one candidate
///  }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    limit: usize,
    used: usize,
}

impl AttemptBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Budget for one of `parts` remaining attempts: an even share of what is left,
    /// rounded up. Charge it back with [`AttemptBudget::absorb`].
    pub fn share(&self, parts: usize) -> Self {
        let left = self.limit.saturating_sub(self.used);
        Self::new(left.div_ceil(parts.max(1)))
    }

    pub fn absorb(&mut self, share: &AttemptBudget) {
        self.used += share.used;
    }

    pub fn spend(&mut self) {
        self.used += 1;
    }

    pub fn expired(&self) -> bool {
        self.used >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// A scored way to attach a word: start cell, direction and ranking data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spot {
    pub start: Position,
    pub direction: Direction,
    /// Crossings beyond the one the spot was generated from.
    pub extra_crossings: usize,
    /// Growth of the letter bounding box, in cells.
    pub area_growth: usize,
    /// Doubled Manhattan distance from the word midpoint to the board center.
    pub center_distance: usize,
}

impl Spot {
    /// Ranking key: smaller is better. Position and direction make it total.
    fn key(&self) -> (Reverse<usize>, usize, usize, Position, Direction) {
        (
            Reverse(self.extra_crossings),
            self.area_growth,
            self.center_distance,
            self.start,
            self.direction,
        )
    }
}

/// Order in which words are attempted: longest first, then by priority, then text.
pub fn search_order(words: &[Word]) -> Vec<WordId> {
    let mut order: Vec<&Word> = words.iter().collect();
    order.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then(a.rank.cmp(&b.rank))
            .then_with(|| a.text.cmp(&b.text))
    });
    order.into_iter().map(|w| w.id).collect()
}

/// Outcome of one [`PlacementSearch::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Words on the board afterwards, in placement order.
    pub placed: Vec<WordId>,
    /// Words left off, in queue order.
    pub unplaced: Vec<WordId>,
    /// The attempt budget ran out before the search was finished.
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    /// Still has candidates to try.
    Open,
    /// The word is on the board under its own checkpoint.
    Placed,
    /// The word was left off on this path.
    Skipped,
}

#[derive(Debug)]
struct Frame {
    word: WordId,
    /// Second pass over a word deferred earlier on the same path.
    retry: bool,
    candidates: Vec<Spot>,
    next: usize,
    state: FrameState,
    /// Moved past its first accepted placement; counts as one discrepancy.
    deviated: bool,
}

impl Frame {
    fn new(word: WordId, retry: bool, candidates: Vec<Spot>) -> Self {
        Self { word, retry, candidates, next: 0, state: FrameState::Open, deviated: false }
    }

    /// Skipping this frame loses its word for good on the current path.
    fn is_loss(&self, retry_deferred: bool) -> bool {
        self.state == FrameState::Skipped && (self.retry || !retry_deferred)
    }
}

/// Bookkeeping for one sweep at a fixed discrepancy limit.
#[derive(Debug, Default)]
struct Sweep {
    limit: usize,
    discrepancies: usize,
    /// Words lost on the current path; bounds what the path can still reach.
    lost: usize,
    /// Some frame wanted to deviate but the limit held it back.
    capped: bool,
}

/// Search state for one grid attempt.
#[derive(Debug)]
pub struct PlacementSearch<'a> {
    words: &'a [Word],
    board: Board,
    policy: AdjacencyPolicy,
}

impl<'a> PlacementSearch<'a> {
    pub fn new(words: &'a [Word], rows: usize, cols: usize, policy: AdjacencyPolicy) -> Self {
        Self { words, board: Board::new(rows, cols), policy }
    }

    /// Resume searching on an existing board (used to re-attach cut-off words).
    pub fn with_board(words: &'a [Word], board: Board, policy: AdjacencyPolicy) -> Self {
        Self { words, board, policy }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// Place `word` across the middle row, horizontally centered.
    pub fn place_seed(&mut self, word: WordId) -> Result<Placement, Rejection> {
        let text = self.words[word].letters();
        let row = self.board.rows() / 2;
        let col = self.board.cols().saturating_sub(text.len()) / 2;
        self.board.fit(text, row as isize, col as isize, Direction::Across)?;
        let start = Position::new(row, col);
        self.board.apply(word, text, start, Direction::Across);
        debug!("seed {} at {start}", self.words[word].text);
        Ok(Placement { word_id: word, start, direction: Direction::Across, length: text.len() })
    }

    /// Attach as many words from `queue` as possible, trying them in queue order.
    ///
    /// A word with no valid spot is deferred; when `retry_deferred` is set it gets one
    /// more try after the rest of the queue. The search backtracks over earlier
    /// placements until every word is placed, the budget runs out, or no arrangement
    /// can beat the best one found. The board is left holding that best arrangement.
    pub fn run(&mut self, queue: &[WordId], retry_deferred: bool, budget: &mut AttemptBudget) -> PassReport {
        let base = self.board.placements().len();
        let mut best: Vec<Placement> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut sweep = Sweep::default();
        let mut finished = false;

        loop {
            // everything placed: nothing left to improve
            if best.len() == queue.len() {
                finished = true;
                break;
            }
            if budget.expired() {
                break;
            }

            let top_open = stack.last().is_some_and(|f| f.state == FrameState::Open);
            if !top_open {
                // extend the path while it can still beat the best
                if queue.len() - sweep.lost > best.len() {
                    if let Some((word, retry)) = Self::next_word(queue, &stack, retry_deferred) {
                        let candidates = self.candidates_for(word);
                        stack.push(Frame::new(word, retry, candidates));
                        continue;
                    }
                }
                if self.backtrack(&mut stack, &mut sweep, retry_deferred) {
                    continue;
                }
                // every path within the limit is done; widen it if anything was held back
                if !sweep.capped {
                    finished = true;
                    break;
                }
                sweep = Sweep { limit: sweep.limit + 1, ..Sweep::default() };
                debug!("widening search to {} discrepancies", sweep.limit);
                continue;
            }

            let Some(frame) = stack.last_mut() else { break };
            let word = frame.word;
            match frame.candidates.get(frame.next).copied() {
                Some(spot) => {
                    frame.next += 1;
                    budget.spend();
                    match self.try_spot(word, spot) {
                        Ok(()) => {
                            frame.state = FrameState::Placed;
                            let placed = &self.board.placements()[base..];
                            if placed.len() > best.len() {
                                best = placed.to_vec();
                            }
                        }
                        Err(reason) => {
                            trace!("{} at {} {} rejected: {reason:?}", self.words[word].text, spot.start, spot.direction);
                        }
                    }
                }
                None => {
                    frame.state = FrameState::Skipped;
                    if frame.is_loss(retry_deferred) {
                        sweep.lost += 1;
                    }
                }
            }
        }

        let exhausted = !finished;
        if exhausted {
            debug!("attempt budget of {} exhausted", budget.limit());
        }

        // swap the current path for the best one
        for frame in stack.iter().rev() {
            if frame.state == FrameState::Placed {
                self.board.rewind();
            }
        }
        let words = self.words;
        for p in &best {
            self.board.apply(p.word_id, words[p.word_id].letters(), p.start, p.direction);
        }

        let placed: Vec<WordId> = best.iter().map(|p| p.word_id).collect();
        let unplaced = queue.iter().copied().filter(|w| !placed.contains(w)).collect();
        PassReport { placed, unplaced, exhausted }
    }

    /// The word the next frame handles: the queue in order, then words deferred on
    /// the current path.
    fn next_word(queue: &[WordId], stack: &[Frame], retry_deferred: bool) -> Option<(WordId, bool)> {
        let depth = stack.len();
        if let Some(&word) = queue.get(depth) {
            return Some((word, false));
        }
        if !retry_deferred {
            return None;
        }
        stack[..queue.len()]
            .iter()
            .filter(|f| f.state == FrameState::Skipped)
            .nth(depth - queue.len())
            .map(|f| (f.word, true))
    }

    /// Undo the most recent choice that still has an alternative within the sweep's
    /// limit. Returns `false` when the stack runs dry.
    fn backtrack(&mut self, stack: &mut Vec<Frame>, sweep: &mut Sweep, retry_deferred: bool) -> bool {
        while let Some(mut frame) = stack.pop() {
            if frame.state == FrameState::Placed {
                self.board.rewind();
                if frame.deviated || sweep.discrepancies < sweep.limit {
                    if !frame.deviated {
                        frame.deviated = true;
                        sweep.discrepancies += 1;
                    }
                    frame.state = FrameState::Open;
                    stack.push(frame);
                    return true;
                }
                sweep.capped = true;
            }
            if frame.is_loss(retry_deferred) {
                sweep.lost -= 1;
            }
            if frame.deviated {
                sweep.discrepancies -= 1;
            }
        }
        false
    }

    /// All valid spots for `word` against the current board, best first.
    pub fn candidates_for(&self, word: WordId) -> Vec<Spot> {
        let text = self.words[word].letters();
        let bounds = self.board.bounds();
        let mut spots = Vec::new();

        // every letter of every placed word is a potential crossing
        for placed in self.board.placements() {
            let direction = placed.direction.perpendicular();
            let (dr, dc) = direction.delta();
            for pos in placed.cells() {
                let Some(letter) = self.board.letter_at(pos) else { continue };
                for (i, _) in text.iter().enumerate().filter(|&(_, &ch)| ch == letter) {
                    // line up letter i of the word with the crossing cell
                    let row = pos.row as isize - (dr * i) as isize;
                    let col = pos.col as isize - (dc * i) as isize;
                    // bounds, conflicts and abutting; neighbors are checked on apply
                    let Ok(fit) = self.board.fit(text, row, col, direction) else { continue };
                    let start = Position::new(row as usize, col as usize);
                    spots.push(self.score(start, direction, text.len(), fit.crossings, bounds));
                }
            }
        }

        // a spot crossing several words is found once per crossing
        spots.sort_by_key(Spot::key);
        spots.dedup_by_key(|s| (s.start, s.direction));
        spots
    }

    fn score(&self, start: Position, direction: Direction, len: usize, crossings: usize, bounds: Option<Bounds>) -> Spot {
        let placement = Placement { word_id: 0, start, direction, length: len };
        let own = Bounds::of(&placement);
        let area_growth = bounds.map_or(own.area(), |b| b.union(own).area() - b.area());

        let end = placement.cell(len - 1);
        let (mid_row, mid_col) = (start.row + end.row, start.col + end.col);
        let (center_row, center_col) = (self.board.rows() - 1, self.board.cols() - 1);
        let center_distance = mid_row.abs_diff(center_row) + mid_col.abs_diff(center_col);

        Spot {
            start,
            direction,
            extra_crossings: crossings.saturating_sub(1),
            area_growth,
            center_distance,
        }
    }

    /// Apply `spot` under a new checkpoint. The checkpoint stays open when the
    /// neighborhood is clean, so the caller can rewind the placement later.
    fn try_spot(&mut self, word: WordId, spot: Spot) -> Result<(), Rejection> {
        let text = self.words[word].letters();
        self.board.fit(text, spot.start.row as isize, spot.start.col as isize, spot.direction)?;
        self.board.checkpoint();
        let fresh = self.board.apply(word, text, spot.start, spot.direction);
        match self.board.check_neighbors(&fresh, spot.direction, self.policy) {
            Ok(()) => {
                trace!("placed {} at {} {}", self.words[word].text, spot.start, spot.direction);
                Ok(())
            }
            Err(reason) => {
                self.board.rewind();
                Err(reason)
            }
        }
    }
}

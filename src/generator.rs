//! Generation pipeline: prepare → search → validate → number.
//!
//! One call builds one puzzle from scratch; nothing is cached between calls.

use std::cmp::Reverse;

use log::{debug, info, warn};

use crate::board::Board;
use crate::clues::ClueMap;
use crate::config::{GeneratorConfig, GRID_AREA_FACTOR, MAX_GRID_SIDE};
use crate::errors::{DropReason, GeneratorError, Warning};
use crate::numbering::assign_numbers;
use crate::prepare::{prepare_words, Candidate, Word, WordId};
use crate::puzzle::{Puzzle, SearchStats};
use crate::search::{search_order, AttemptBudget, PlacementSearch};
use crate::validate::{reconnect, settle_symmetry};

/// Side of the square board for a word set: `ceil(sqrt(letters × 2.2))`, at least the
/// longest word, rounded up to an odd number and capped at [`MAX_GRID_SIDE`].
pub fn grid_side_for(total_letters: usize, longest: usize) -> usize {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let side = (total_letters as f64 * GRID_AREA_FACTOR).sqrt().ceil() as usize;
    let side = side.max(longest);
    let side = if side % 2 == 0 { side + 1 } else { side };
    side.min(MAX_GRID_SIDE)
}

/// One search on one board size.
struct Attempt {
    side: usize,
    board: Board,
    /// Dropped words with the reason, in search order.
    dropped: Vec<(WordId, DropReason)>,
    exhausted: bool,
}

impl Attempt {
    fn placed(&self) -> usize {
        self.board.placements().len()
    }
}

fn run_attempt(words: &[Word], order: &[WordId], side: usize, config: &GeneratorConfig, budget: &mut AttemptBudget) -> Attempt {
    let seed = order[0];
    let mut search = PlacementSearch::new(words, side, side, config.adjacency);
    if let Err(reason) = search.place_seed(seed) {
        // the side is never below the longest word, so this is unreachable in practice
        warn!("seed {} does not fit a {side}x{side} board: {reason:?}", words[seed].text);
        return Attempt {
            side,
            board: search.into_board(),
            dropped: order.iter().map(|&w| (w, DropReason::Unplaceable)).collect(),
            exhausted: false,
        };
    }

    let report = search.run(&order[1..], true, budget);
    let (board, reconnection) = reconnect(words, search.into_board(), seed, config.adjacency, budget);

    let mut dropped: Vec<(WordId, DropReason)> =
        report.unplaced.iter().map(|&w| (w, DropReason::Unplaceable)).collect();
    dropped.extend(reconnection.dropped.iter().map(|&w| (w, DropReason::Disconnected)));

    debug!(
        "{side}x{side}: placed {}, dropped {}, {} attempts used",
        board.placements().len(),
        dropped.len(),
        budget.used()
    );

    Attempt { side, board, dropped, exhausted: report.exhausted || reconnection.exhausted }
}

/// Build a puzzle from candidate terms and their clues.
///
/// # Errors
///
/// - [`GeneratorError::InvalidConfig`] if `config` is out of range.
/// - [`GeneratorError::InsufficientWords`] if fewer than two words survive preparation.
/// - [`GeneratorError::UnplaceableWords`] if strict mode drops a word, or if nothing
///   could be attached to the seed word and at least half of the words were dropped.
pub fn generate(candidates: &[Candidate], clues: &ClueMap, config: &GeneratorConfig) -> Result<Puzzle, GeneratorError> {
    config.validate()?;
    let prepared = prepare_words(candidates, clues, config)?;
    let words = &prepared.words;
    let mut warnings = prepared.warnings.clone();

    let longest = prepared.longest();
    let mut side = match config.grid_side {
        Some(requested) if requested < longest => {
            warnings.push(Warning::GridResized { requested, actual: longest });
            longest
        }
        Some(requested) => requested,
        None => grid_side_for(prepared.total_letters(), longest),
    };

    let order = search_order(words);
    let mut budget = AttemptBudget::new(config.attempt_budget);
    let mut resizes = 0;
    let mut best: Option<Attempt> = None;
    loop {
        // each remaining board size gets an even share of what is left
        let mut share = budget.share(config.max_resize_attempts - resizes + 1);
        let attempt = run_attempt(words, &order, side, config, &mut share);
        budget.absorb(&share);
        let lossless = attempt.dropped.is_empty();
        if best.as_ref().map_or(true, |b| attempt.placed() > b.placed()) {
            best = Some(attempt);
        }
        if lossless || budget.expired() || resizes >= config.max_resize_attempts || side + 2 > MAX_GRID_SIDE {
            break;
        }
        side += 2;
        resizes += 1;
        info!("retrying on a {side}x{side} board");
    }
    let Some(best) = best else {
        return Err(GeneratorError::UnplaceableWords { dropped: Vec::new(), total: words.len() });
    };

    let placed = best.placed();
    let Attempt { side: best_side, board, mut dropped, exhausted } = best;
    dropped.sort_by_key(|&(w, _)| Reverse(words[w].rank));
    let total = words.len();
    let only_seed = placed == 1 && dropped.len() * 2 >= total && !exhausted;
    if (config.strict && !dropped.is_empty()) || only_seed {
        return Err(GeneratorError::UnplaceableWords {
            dropped: dropped.iter().map(|&(w, _)| words[w].text.clone()).collect(),
            total,
        });
    }

    for &(w, reason) in &dropped {
        warnings.push(Warning::Dropped { word: words[w].text.clone(), rank: words[w].rank, reason });
    }
    if exhausted {
        warnings.push(Warning::GridOverflow { budget: budget.limit() });
    }

    let symmetry = settle_symmetry(&board, config.trim);
    if symmetry.relaxed() {
        warnings.push(Warning::SymmetryRelaxed { asymmetric_cells: symmetry.asymmetric_cells.clone() });
    }

    let placements = board.placements_in(symmetry.window);
    let (slots, slot_warnings) = assign_numbers(&symmetry.grid, &placements, words);
    warnings.extend(slot_warnings);

    let stats = SearchStats {
        grid_side: best_side,
        attempts: budget.used(),
        resizes,
        placed,
        dropped: dropped.len() + prepared.over_cap,
    };
    info!(
        "generated \"{}\": {placed} of {total} words on {}x{} ({} warnings)",
        config.title,
        symmetry.grid.rows(),
        symmetry.grid.cols(),
        warnings.len()
    );

    Ok(Puzzle {
        title: config.title.clone(),
        symmetry_relaxed: symmetry.relaxed(),
        grid: symmetry.grid,
        slots,
        placements,
        warnings,
        budget_exhausted: exhausted,
        stats,
    })
}

/// Convenience wrapper for `(word, clue)` pairs in priority order.
///
/// # Errors
///
/// Same as [`generate`].
pub fn generate_from_pairs<W: AsRef<str>, C: AsRef<str>>(
    pairs: &[(W, C)],
    config: &GeneratorConfig,
) -> Result<Puzzle, GeneratorError> {
    let candidates: Vec<Candidate> = pairs.iter().map(|(w, _)| Candidate::new(w.as_ref())).collect();
    let clues: ClueMap = pairs.iter().map(|(w, c)| (w.as_ref(), c.as_ref())).collect();
    generate(&candidates, &clues, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::Variant;

    const PAIRS: [(&str, &str); 4] = [
        ("python", "Language named after a comedy troupe"),
        ("loop", "Repeating control structure"),
        ("array", "Indexed collection"),
        ("type", "Kind of value"),
    ];

    #[test]
    fn test_grid_side_for() {
        // 19 letters: sqrt(41.8) rounds up to 7
        assert_eq!(grid_side_for(19, 6), 7);
        // raised to the longest word, then made odd
        assert_eq!(grid_side_for(8, 12), 13);
        assert_eq!(grid_side_for(10, 4), 5);
        assert_eq!(grid_side_for(10_000, 15), MAX_GRID_SIDE);
    }

    #[test]
    fn test_generates_connected_puzzle() {
        let puzzle = generate_from_pairs(&PAIRS, &GeneratorConfig::default()).unwrap();
        assert_eq!(puzzle.placements.len(), 4);
        assert!(puzzle.intersections() >= 2);
        assert!(puzzle.is_connected());
        assert!(puzzle.grid.is_symmetric() || puzzle.symmetry_relaxed);
        // the 7x7 first attempt loses ARRAY, so the board grows once
        assert_eq!(puzzle.stats.resizes, 1);
        assert_eq!(puzzle.stats.grid_side, 9);
    }

    #[test]
    fn test_ten_words_pack_on_first_board() {
        // every word fits the first board; placing them all takes backtracking
        let pairs: Vec<(&str, &str)> = [
            "PYTHON", "ALGORITHM", "FUNCTION", "VARIABLE", "LOOP", "CLASS", "METHOD", "OBJECT", "STRING", "INTEGER",
        ]
        .into_iter()
        .map(|w| (w, ""))
        .collect();
        let puzzle = generate_from_pairs(&pairs, &GeneratorConfig::default()).unwrap();
        assert_eq!(puzzle.placements.len(), 10);
        assert_eq!(puzzle.stats.resizes, 0);
        assert_eq!(puzzle.stats.grid_side, 13);
        assert!(!puzzle.budget_exhausted);
        assert!(puzzle.is_connected());
    }

    #[test]
    fn test_slots_carry_clues() {
        let puzzle = generate_from_pairs(&PAIRS, &GeneratorConfig::default()).unwrap();
        let python = puzzle.slots.iter().find(|s| s.answer == "PYTHON").unwrap();
        assert_eq!(python.clue.as_str(), "Language named after a comedy troupe");
        assert_eq!(python.direction, crate::grid::Direction::Across);
        let data = puzzle.to_data(Variant::Student);
        assert_eq!(data.clues.across.len() + data.clues.down.len(), puzzle.slots.len());
    }

    #[test]
    fn test_deterministic() {
        let a = generate_from_pairs(&PAIRS, &GeneratorConfig::default()).unwrap();
        let b = generate_from_pairs(&PAIRS, &GeneratorConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn test_tiny_budget_is_not_an_error() {
            let config = GeneratorConfig::default().with_attempt_budget(1);
            let puzzle = generate_from_pairs(&PAIRS, &config).unwrap();
            assert!(puzzle.budget_exhausted);
            assert!(puzzle.warnings.iter().any(|w| matches!(w, Warning::GridOverflow { budget: 1 })));
        }

        #[test]
        fn test_small_explicit_side_is_raised() {
            let config = GeneratorConfig::default().with_grid_side(3);
            let puzzle = generate_from_pairs(&PAIRS, &config).unwrap();
            assert!(puzzle.warnings.contains(&Warning::GridResized { requested: 3, actual: 6 }));
        }

        #[test]
        fn test_no_resize_keeps_partial_puzzle() {
            let config = GeneratorConfig::default().with_max_resize_attempts(0);
            let puzzle = generate_from_pairs(&PAIRS, &config).unwrap();
            assert_eq!(puzzle.placements.len(), 3);
            assert!(puzzle.warnings.iter().any(|w| matches!(
                w,
                Warning::Dropped { word, reason: DropReason::Unplaceable, .. } if word == "ARRAY"
            )));
        }

        #[test]
        fn test_word_cap() {
            let config = GeneratorConfig::default().with_max_words(2);
            let puzzle = generate_from_pairs(&PAIRS, &config).unwrap();
            assert!(puzzle.placements.len() <= 2);
            assert_eq!(puzzle.stats.dropped, 2 + 2 - puzzle.placements.len());
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_single_word() {
            let err = generate_from_pairs(&[("loop", "Circle")], &GeneratorConfig::default()).unwrap_err();
            assert_eq!(err.code(), "G001");
        }

        #[test]
        fn test_no_shared_letters() {
            let err = generate_from_pairs(&[("aaaa", ""), ("bbbb", "")], &GeneratorConfig::default()).unwrap_err();
            match err {
                GeneratorError::UnplaceableWords { dropped, total } => {
                    assert_eq!(dropped, vec!["BBBB".to_string()]);
                    assert_eq!(total, 2);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_strict_mode_rejects_any_drop() {
            let config = GeneratorConfig::default().with_strict(true).with_max_resize_attempts(0);
            let err = generate_from_pairs(&PAIRS, &config).unwrap_err();
            assert!(matches!(err, GeneratorError::UnplaceableWords { total: 4, .. }));
        }

        #[test]
        fn test_invalid_config() {
            let config = GeneratorConfig::default().with_attempt_budget(0);
            assert_eq!(generate_from_pairs(&PAIRS, &config).unwrap_err().code(), "G003");
        }
    }
}

//! Row-major clue numbering.

use serde::{Deserialize, Serialize};

use crate::clues::Clue;
use crate::config::MIN_SLOT_LEN;
use crate::errors::Warning;
use crate::grid::{Direction, Grid, Placement, Position};
use crate::prepare::{Word, WordId};

/// A numbered run of letter cells and what fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub number: usize,
    pub direction: Direction,
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub answer: String,
    pub clue: Clue,
    /// The placed word filling this slot; `None` for an unintended run.
    #[serde(skip)]
    pub word_id: Option<WordId>,
}

impl Slot {
    pub fn start(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Length of the letter run starting at `pos` along `direction`, or 0 when a letter
/// precedes `pos` (the run starts earlier).
fn run_from(grid: &Grid, pos: Position, direction: Direction) -> usize {
    let (dr, dc) = direction.delta();
    if pos.row >= dr && pos.col >= dc && grid.is_letter(pos.row - dr, pos.col - dc) {
        return 0;
    }
    let mut len = 0;
    let mut cur = pos;
    while grid.is_letter(cur.row, cur.col) {
        len += 1;
        cur = cur.step(direction, 1);
    }
    len
}

/// Number every slot of `grid`, attaching answers and clues from `placements`.
///
/// `placements` must use the same coordinates as `grid`. Across slots come before
/// down slots at a shared number, and the output is ordered by number.
pub fn assign_numbers(grid: &Grid, placements: &[Placement], words: &[Word]) -> (Vec<Slot>, Vec<Warning>) {
    let mut slots = Vec::new();
    let mut warnings = Vec::new();
    let mut next = 1;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            if !grid.is_letter(row, col) {
                continue;
            }
            let mut numbered = false;
            for direction in [Direction::Across, Direction::Down] {
                let length = run_from(grid, pos, direction);
                if length < MIN_SLOT_LEN {
                    continue;
                }
                let Some(answer) = grid.word_at(pos, direction, length) else { continue };
                let placed = placements
                    .iter()
                    .find(|p| p.start == pos && p.direction == direction && p.length == length);
                let (clue, word_id) = match placed {
                    Some(p) => (words[p.word_id].clue.clone(), Some(p.word_id)),
                    None => {
                        warnings.push(Warning::UnclaimedRun { answer: answer.clone(), direction, start: pos });
                        (Clue::Missing, None)
                    }
                };
                slots.push(Slot { number: next, direction, row, col, length, answer, clue, word_id });
                numbered = true;
            }
            if numbered {
                next += 1;
            }
        }
    }

    (slots, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn grid_from(lines: &[&str]) -> Grid {
        let mut g = Grid::new(lines.len(), lines[0].len());
        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch != '.' {
                    g.set(r, c, Cell::Letter(ch));
                }
            }
        }
        g
    }

    fn word(id: WordId, text: &str, clue: &str) -> Word {
        Word { id, text: text.to_string(), clue: Clue::from(clue), rank: id }
    }

    #[test]
    fn test_shared_number_at_corner() {
        let grid = grid_from(&["LOOP", "A...", "T...", "E..."]);
        let words = vec![word(0, "LOOP", "Repeat"), word(1, "LATE", "Tardy")];
        let placements = vec![
            Placement { word_id: 0, start: Position::new(0, 0), direction: Direction::Across, length: 4 },
            Placement { word_id: 1, start: Position::new(0, 0), direction: Direction::Down, length: 4 },
        ];
        let (slots, warnings) = assign_numbers(&grid, &placements, &words);
        assert!(warnings.is_empty());
        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].number, slots[0].direction), (1, Direction::Across));
        assert_eq!((slots[1].number, slots[1].direction), (1, Direction::Down));
        assert_eq!(slots[1].answer, "LATE");
        assert_eq!(slots[1].clue.as_str(), "Tardy");
    }

    #[test]
    fn test_numbers_increase_row_major() {
        let grid = grid_from(&[
            "..A...",
            "..R...",
            "PYTHON",
            "..E...",
        ]);
        let words = vec![word(0, "PYTHON", "Snake"), word(1, "ARTE", "")];
        let placements = vec![
            Placement { word_id: 0, start: Position::new(2, 0), direction: Direction::Across, length: 6 },
            Placement { word_id: 1, start: Position::new(0, 2), direction: Direction::Down, length: 4 },
        ];
        let (slots, _) = assign_numbers(&grid, &placements, &words);
        let numbered: Vec<_> = slots.iter().map(|s| (s.number, s.row, s.col, s.direction)).collect();
        assert_eq!(numbered, vec![(1, 0, 2, Direction::Down), (2, 2, 0, Direction::Across)]);
        assert!(slots[0].clue.is_missing());
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn test_short_runs_are_not_slots() {
            let grid = grid_from(&["ABC.", "....", "....", "...."]);
            let (slots, warnings) = assign_numbers(&grid, &[], &[]);
            assert!(slots.is_empty());
            assert!(warnings.is_empty());
        }

        #[test]
        fn test_unclaimed_run_gets_missing_clue() {
            let grid = grid_from(&["ABCD", "....", "...."]);
            let (slots, warnings) = assign_numbers(&grid, &[], &[]);
            assert_eq!(slots.len(), 1);
            assert_eq!(slots[0].answer, "ABCD");
            assert!(slots[0].clue.is_missing());
            assert_eq!(slots[0].word_id, None);
            assert_eq!(
                warnings,
                vec![Warning::UnclaimedRun {
                    answer: "ABCD".to_string(),
                    direction: Direction::Across,
                    start: Position::new(0, 0),
                }]
            );
        }
    }
}

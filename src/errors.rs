//! Error and warning types for crossword generation, with error codes and help text.
//!
//! # Error Codes
//!
//! Fatal errors ([`GeneratorError`]):
//!
//! - G001: `InsufficientWords` (Fewer than two usable words after preparation)
//! - G002: `UnplaceableWords` (Only the seed survived, or strict mode dropped a word)
//! - G003: `InvalidConfig` (Generator configuration is out of range)
//! - G004: `WordListIo` (Word list file could not be read)
//!
//! Neutral-structure errors ([`DataError`]), raised when rebuilding a grid from
//! serialized puzzle data:
//!
//! - D001: `RaggedGrid`
//! - D002: `SizeMismatch`
//! - D003: `UnknownCell`
//! - D004: `AnswerOutOfBounds`
//! - D005: `ConflictingAnswer`
//! - D006: `Json`
//!
//! Non-fatal conditions are reported as [`Warning`]s (W001-W008) attached to the
//! returned puzzle.
//!
//! # Examples
//!
//! ```
//! use crossgrid::errors::GeneratorError;
//!
//! let err = GeneratorError::InsufficientWords { valid: 1, required: 2 };
//! assert_eq!(err.code(), "G001");
//! println!("{}", err.display_detailed());
//! ```

use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;

use crate::grid::{Direction, Position};

/// Fatal failures of a generation request.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("need at least {required} usable words, found {valid}")]
    InsufficientWords { valid: usize, required: usize },

    #[error("could not place {} of {total} words", .dropped.len())]
    UnplaceableWords { dropped: Vec<String>, total: usize },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to read word list from '{path}': {source}")]
    WordListIo {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl GeneratorError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GeneratorError::InsufficientWords { .. } => "G001",
            GeneratorError::UnplaceableWords { .. } => "G002",
            GeneratorError::InvalidConfig { .. } => "G003",
            GeneratorError::WordListIo { .. } => "G004",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            GeneratorError::InsufficientWords { .. } => "Fewer than two usable words after preparation",
            GeneratorError::UnplaceableWords { .. } => "Words could not be placed into the grid",
            GeneratorError::InvalidConfig { .. } => "Generator configuration is out of range",
            GeneratorError::WordListIo { .. } => "Word list file could not be read",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            GeneratorError::InsufficientWords { .. } => "After rejecting words shorter than 4 letters, longer than 15 letters, containing non-letters, or repeated, fewer than two words remained. A crossword needs at least one intersection, so at least two words are required.",
            GeneratorError::UnplaceableWords { .. } => "Either no word could be attached to the seed word and the dropped words make up at least half of the input, or strict mode was requested and at least one word could not be placed.",
            GeneratorError::InvalidConfig { .. } => "A configuration value is outside its allowed range (for example a zero attempt budget or a grid side larger than the maximum).",
            GeneratorError::WordListIo { .. } => "The word list file could not be opened or is not valid UTF-8.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            GeneratorError::InsufficientWords { .. } => Some("Supply at least two alphabetic words of 4 to 15 letters"),
            GeneratorError::UnplaceableWords { .. } => Some("Add words that share letters with each other, or disable strict mode to accept a smaller puzzle"),
            GeneratorError::InvalidConfig { .. } => Some("Check the attempt budget (must be positive) and grid side (at most 45)"),
            GeneratorError::WordListIo { .. } => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Failures when turning serialized puzzle data back into a grid.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },

    #[error("declared size {rows}x{cols} does not match a grid of {found_rows} rows")]
    SizeMismatch { rows: usize, cols: usize, found_rows: usize },

    #[error("unknown cell character '{ch}' at ({row}, {col})")]
    UnknownCell { ch: char, row: usize, col: usize },

    #[error("{direction} clue {number} runs outside the grid")]
    AnswerOutOfBounds { number: usize, direction: Direction },

    #[error("answers disagree at ({row}, {col})")]
    ConflictingAnswer { row: usize, col: usize },

    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DataError::RaggedGrid { .. } => "D001",
            DataError::SizeMismatch { .. } => "D002",
            DataError::UnknownCell { .. } => "D003",
            DataError::AnswerOutOfBounds { .. } => "D004",
            DataError::ConflictingAnswer { .. } => "D005",
            DataError::Json(_) => "D006",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            DataError::RaggedGrid { .. } => "Grid rows have different lengths",
            DataError::SizeMismatch { .. } => "Declared size disagrees with the grid matrix",
            DataError::UnknownCell { .. } => "Grid matrix contains an unexpected character",
            DataError::AnswerOutOfBounds { .. } => "A clue answer does not fit inside the grid",
            DataError::ConflictingAnswer { .. } => "Two clue answers put different letters in one cell",
            DataError::Json(_) => "Puzzle JSON could not be parsed",
        }
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            DataError::RaggedGrid { .. } | DataError::SizeMismatch { .. } => "The neutral puzzle structure must describe a rectangular grid whose matrix matches the declared rows and columns.",
            DataError::UnknownCell { .. } => "Cells must be '.' (blocked), '_' (open cell in the student variant) or an uppercase letter A-Z.",
            DataError::AnswerOutOfBounds { .. } | DataError::ConflictingAnswer { .. } => "Clue entries are used to restore letters in the student variant, so every answer must fit the grid and agree with crossing answers.",
            DataError::Json(_) => "The input is not a valid serialized puzzle.",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            DataError::UnknownCell { .. } => Some("Use '.' for blocked cells and uppercase letters for answers"),
            DataError::Json(_) => Some("Produce the JSON with PuzzleData::to_json"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Why the preparer refused a candidate word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    /// Accented or other non-ASCII letters; only `A`-`Z` can go in the grid.
    NonAscii,
    NonAlphabetic,
    TooShort { len: usize },
    TooLong { len: usize },
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "empty entry"),
            RejectReason::NonAscii => write!(f, "contains non-ASCII characters"),
            RejectReason::NonAlphabetic => write!(f, "contains non-alphabetic characters"),
            RejectReason::TooShort { len } => write!(f, "{len} letters is shorter than the minimum"),
            RejectReason::TooLong { len } => write!(f, "{len} letters is longer than the maximum"),
        }
    }
}

/// Why an accepted word is missing from the finished puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No valid intersection was found, even on the retry pass.
    Unplaceable,
    /// Removed because the caller capped the number of words.
    OverWordCap,
    /// Its component was cut off from the main puzzle and could not be re-attached.
    Disconnected,
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Unplaceable => write!(f, "no valid intersection"),
            DropReason::OverWordCap => write!(f, "over the word cap"),
            DropReason::Disconnected => write!(f, "could not be reconnected"),
        }
    }
}

/// Non-fatal conditions attached to a finished puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    #[error("rejected \"{word}\": {reason}")]
    Rejected { word: String, reason: RejectReason },

    #[error("duplicate \"{word}\" ignored (first occurrence kept)")]
    Duplicate { word: String },

    #[error("no clue supplied for \"{word}\"")]
    MissingClue { word: String },

    #[error("dropped \"{word}\" (rank {rank}): {reason}")]
    Dropped { word: String, rank: usize, reason: DropReason },

    #[error("attempt budget of {budget} candidate evaluations exhausted; returning the best partial puzzle")]
    GridOverflow { budget: usize },

    #[error("blocked cells are not 180-degree symmetric ({} unmatched letter cells)", .asymmetric_cells.len())]
    SymmetryRelaxed { asymmetric_cells: Vec<Position> },

    #[error("grid side raised from {requested} to {actual}")]
    GridResized { requested: usize, actual: usize },

    #[error("unclued {direction} run \"{answer}\" at {start}")]
    UnclaimedRun { answer: String, direction: Direction, start: Position },
}

impl Warning {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Warning::Rejected { .. } => "W001",
            Warning::Duplicate { .. } => "W002",
            Warning::MissingClue { .. } => "W003",
            Warning::Dropped { .. } => "W004",
            Warning::GridOverflow { .. } => "W005",
            Warning::SymmetryRelaxed { .. } => "W006",
            Warning::GridResized { .. } => "W007",
            Warning::UnclaimedRun { .. } => "W008",
        }
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}

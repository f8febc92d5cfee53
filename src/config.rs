//! Generator configuration and the fixed limits of the engine.

use crate::errors::GeneratorError;

/// Shortest word the preparer accepts.
pub const MIN_WORD_LEN: usize = 4;
/// Longest word the preparer accepts.
pub const MAX_WORD_LEN: usize = 15;
/// Shortest run that numbering treats as a slot.
pub const MIN_SLOT_LEN: usize = MIN_WORD_LEN;
/// Largest grid side the engine will build or grow to.
pub const MAX_GRID_SIDE: usize = 45;
/// Multiplier applied to the total letter count when auto-sizing the grid.
pub const GRID_AREA_FACTOR: f64 = 2.2;
/// Minimum number of prepared words for a puzzle.
pub const MIN_WORDS: usize = 2;

pub const DEFAULT_ATTEMPT_BUDGET: usize = 20_000;
pub const DEFAULT_MAX_RESIZE_ATTEMPTS: usize = 2;
pub const DEFAULT_TITLE: &str = "Crossword";

/// How aggressively new cells may sit next to existing letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjacencyPolicy {
    /// Reject unintended perpendicular fragments of 2 or 3 letters; longer runs
    /// are tolerated and later numbered as unclued slots.
    #[default]
    Lenient,
    /// Reject any unintended perpendicular run.
    Strict,
}

/// Options for one generation request.
///
/// ```
/// use crossgrid::config::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_title("Python Basics")
///     .with_attempt_budget(5_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub title: String,
    /// Fixed square grid side. `None` computes one from the word set.
    pub grid_side: Option<usize>,
    /// Candidate evaluations allowed across the whole request.
    pub attempt_budget: usize,
    /// Treat any dropped word as fatal.
    pub strict: bool,
    /// Keep only the highest-priority `n` words.
    pub max_words: Option<usize>,
    pub adjacency: AdjacencyPolicy,
    /// Crop the finished grid to the bounding box of its letters.
    pub trim: bool,
    /// How many times a lossy attempt may be retried on a larger grid.
    pub max_resize_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            grid_side: None,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            strict: false,
            max_words: None,
            adjacency: AdjacencyPolicy::default(),
            trim: true,
            max_resize_attempts: DEFAULT_MAX_RESIZE_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_grid_side(mut self, side: usize) -> Self {
        self.grid_side = Some(side);
        self
    }

    #[must_use]
    pub fn with_attempt_budget(mut self, budget: usize) -> Self {
        self.attempt_budget = budget;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = Some(max_words);
        self
    }

    #[must_use]
    pub fn with_adjacency(mut self, adjacency: AdjacencyPolicy) -> Self {
        self.adjacency = adjacency;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn with_max_resize_attempts(mut self, attempts: usize) -> Self {
        self.max_resize_attempts = attempts;
        self
    }

    /// Check ranges before any work is done.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidConfig`] for a zero attempt budget, a zero
    /// or oversized grid side, or a word cap below two.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.attempt_budget == 0 {
            return Err(invalid("attempt budget must be positive"));
        }
        match self.grid_side {
            Some(0) => return Err(invalid("grid side must be positive")),
            Some(side) if side > MAX_GRID_SIDE => {
                return Err(invalid(format!("grid side {side} exceeds the maximum of {MAX_GRID_SIDE}")));
            }
            _ => {}
        }
        if let Some(n) = self.max_words {
            if n < MIN_WORDS {
                return Err(invalid(format!("max words must be at least {MIN_WORDS}, got {n}")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> GeneratorError {
    GeneratorError::InvalidConfig { reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.trim);
        assert_eq!(config.adjacency, AdjacencyPolicy::Lenient);
        assert_eq!(config.attempt_budget, DEFAULT_ATTEMPT_BUDGET);
    }

    #[test]
    fn test_setters_chain() {
        let config = GeneratorConfig::default()
            .with_title("T")
            .with_grid_side(11)
            .with_strict(true)
            .with_max_words(10)
            .with_adjacency(AdjacencyPolicy::Strict)
            .with_trim(false)
            .with_max_resize_attempts(0);
        assert_eq!(config.title, "T");
        assert_eq!(config.grid_side, Some(11));
        assert!(config.strict);
        assert_eq!(config.max_words, Some(10));
        assert_eq!(config.adjacency, AdjacencyPolicy::Strict);
        assert!(!config.trim);
        assert_eq!(config.max_resize_attempts, 0);
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_zero_budget_rejected() {
            let err = GeneratorConfig::default().with_attempt_budget(0).validate().unwrap_err();
            assert_eq!(err.code(), "G003");
        }

        #[test]
        fn test_oversized_side_rejected() {
            let err = GeneratorConfig::default().with_grid_side(MAX_GRID_SIDE + 1).validate().unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidConfig { .. }));
            assert!(err.to_string().contains("exceeds the maximum"));
        }

        #[test]
        fn test_zero_side_rejected() {
            assert!(GeneratorConfig::default().with_grid_side(0).validate().is_err());
        }

        #[test]
        fn test_word_cap_below_two_rejected() {
            assert!(GeneratorConfig::default().with_max_words(1).validate().is_err());
            assert!(GeneratorConfig::default().with_max_words(2).validate().is_ok());
        }
    }
}

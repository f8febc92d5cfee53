//! `prepare`: turn raw candidate terms into the word set the search works on.
//!
//! Candidates are trimmed, checked for alphabetic content and length, uppercased and
//! deduplicated (first occurrence wins). Each surviving word gets a priority rank:
//! by score descending when any candidate carries a score, otherwise by input order.
//! Rank 0 is the most important word and the last one to be dropped.

use std::cmp::Reverse;
use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::clues::{Clue, ClueMap};
use crate::config::{GeneratorConfig, MAX_WORD_LEN, MIN_WORDS, MIN_WORD_LEN};
use crate::errors::{DropReason, GeneratorError, RejectReason, Warning};

/// Stable identifier of a prepared word: its index in [`PreparedWords::words`].
pub type WordId = usize;

/// A candidate term as supplied by the term source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    #[serde(default)]
    pub score: Option<u32>,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), score: None }
    }

    pub fn with_score(text: impl Into<String>, score: u32) -> Self {
        Self { text: text.into(), score: Some(score) }
    }
}

impl From<&str> for Candidate {
    fn from(text: &str) -> Self {
        Candidate::new(text)
    }
}

/// An accepted word. Immutable once prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub id: WordId,
    /// Uppercase ASCII letters.
    pub text: String,
    pub clue: Clue,
    pub rank: usize,
}

impl Word {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn letters(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Output of [`prepare_words`].
#[derive(Debug, Clone)]
pub struct PreparedWords {
    /// Accepted words in input order; `words[i].id == i`.
    pub words: Vec<Word>,
    pub warnings: Vec<Warning>,
    /// Number of words removed by the `max_words` cap.
    pub over_cap: usize,
}

impl PreparedWords {
    pub fn total_letters(&self) -> usize {
        self.words.iter().map(Word::len).sum()
    }

    pub fn longest(&self) -> usize {
        self.words.iter().map(Word::len).max().unwrap_or(0)
    }
}

fn check_text(text: &str) -> Result<String, RejectReason> {
    if text.is_empty() {
        return Err(RejectReason::Empty);
    }
    if !text.is_ascii() {
        return Err(RejectReason::NonAscii);
    }
    if !text.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(RejectReason::NonAlphabetic);
    }
    let len = text.len();
    if len < MIN_WORD_LEN {
        return Err(RejectReason::TooShort { len });
    }
    if len > MAX_WORD_LEN {
        return Err(RejectReason::TooLong { len });
    }
    Ok(text.to_ascii_uppercase())
}

/// Validate and normalize `candidates`, resolve clues and assign priority ranks.
///
/// # Errors
///
/// Returns [`GeneratorError::InsufficientWords`] if fewer than two words survive.
pub fn prepare_words(
    candidates: &[Candidate],
    clues: &ClueMap,
    config: &GeneratorConfig,
) -> Result<PreparedWords, GeneratorError> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    // (uppercase text, score) in input order
    let mut kept: Vec<(String, Option<u32>)> = Vec::new();

    for candidate in candidates {
        let raw = candidate.text.trim();
        match check_text(raw) {
            Ok(text) => {
                if seen.insert(text.clone()) {
                    kept.push((text, candidate.score));
                } else {
                    warnings.push(Warning::Duplicate { word: text });
                }
            }
            Err(reason) => warnings.push(Warning::Rejected { word: raw.to_string(), reason }),
        }
    }

    if kept.len() < MIN_WORDS {
        return Err(GeneratorError::InsufficientWords { valid: kept.len(), required: MIN_WORDS });
    }

    // priority order: indices into `kept`
    let mut order: Vec<usize> = (0..kept.len()).collect();
    if kept.iter().any(|(_, score)| score.is_some()) {
        order.sort_by_key(|&i| (Reverse(kept[i].1.unwrap_or(0)), i));
    }
    let mut rank_of = vec![0; kept.len()];
    for (rank, &i) in order.iter().enumerate() {
        rank_of[i] = rank;
    }

    let cap = config.max_words.unwrap_or(usize::MAX);
    let mut over_cap = 0;
    for &i in order.iter().skip(cap).rev() {
        warnings.push(Warning::Dropped {
            word: kept[i].0.clone(),
            rank: rank_of[i],
            reason: DropReason::OverWordCap,
        });
        over_cap += 1;
    }

    let mut words = Vec::with_capacity(kept.len() - over_cap);
    for (i, (text, _)) in kept.into_iter().enumerate() {
        if rank_of[i] >= cap {
            continue;
        }
        let clue = clues.lookup(&text);
        if clue.is_missing() {
            warnings.push(Warning::MissingClue { word: text.clone() });
        }
        words.push(Word { id: words.len(), text, clue, rank: rank_of[i] });
    }

    debug!(
        "prepared {} words ({} warnings, {} over cap)",
        words.len(),
        warnings.len(),
        over_cap
    );

    Ok(PreparedWords { words, warnings, over_cap })
}

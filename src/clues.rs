//! Word → clue mapping supplied by the clue author.
//!
//! Lookups never fail: a word without a usable clue resolves to
//! [`Clue::Missing`], and the preparer turns that into a warning.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Clue attached to a word. `Missing` is an explicit sentinel, not an absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clue {
    Text(String),
    #[default]
    Missing,
}

impl Clue {
    /// Clue text, or the empty string for a missing clue.
    pub fn as_str(&self) -> &str {
        match self {
            Clue::Text(s) => s,
            Clue::Missing => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Clue::Missing)
    }
}

impl From<&str> for Clue {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Clue::Missing
        } else {
            Clue::Text(s.to_string())
        }
    }
}

/// Case-insensitive mapping from word text to clue text.
///
/// Keys are normalized to uppercase. The first entry for a word wins even when its
/// clue is blank, matching the preparer's keep-first-occurrence rule for duplicate
/// words: a later duplicate cannot supply the clue the first occurrence lacked.
#[derive(Debug, Clone, Default)]
pub struct ClueMap {
    entries: HashMap<String, Clue>,
}

impl ClueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the clue for `word` unless the word already has an entry.
    /// A blank clue is recorded as [`Clue::Missing`].
    pub fn insert(&mut self, word: &str, clue: &str) {
        self.entries
            .entry(word.trim().to_ascii_uppercase())
            .or_insert_with(|| Clue::from(clue));
    }

    /// Resolve the clue for `word` (any case).
    pub fn lookup(&self, word: &str) -> Clue {
        self.entries
            .get(&word.trim().to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ClueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ClueMap::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v.as_ref());
        }
        map
    }
}

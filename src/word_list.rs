//! `word_list`: load candidate words (with optional scores and clues) from text.
//!
//! One candidate per line:
//!
//! ```text
//! # comment
//! PYTHON;90;Language named after a comedy troupe
//! LOOP;;Repeating control structure
//! ARRAY;70
//! TYPE;Kind of value
//! ```
//!
//! Fields are `ENTRY[;SCORE][;CLUE]`. With three fields the middle one is the score
//! (empty means unscored) and everything after the second `;` is the clue, so clues
//! may contain semicolons. With two fields a numeric second field is a score, anything
//! else is a clue. Blank lines and `#` comments are ignored; lines that do not parse
//! are skipped and counted.
//!
//! Parsing works on in-memory text so it is available to WebAssembly builds;
//! `load_from_path` is native-only.

use log::debug;
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, u32 as score},
    combinator::{all_consuming, opt, rest},
    sequence::preceded,
    IResult,
    Parser,
};

use crate::clues::ClueMap;
#[cfg(not(target_arch = "wasm32"))]
use crate::errors::GeneratorError;
use crate::prepare::Candidate;

/// Parser result type for one line
type LResult<'a, O> = IResult<&'a str, O>;

/// Raw fields of one line: entry, optional second field, optional remainder.
type Fields<'a> = (&'a str, Option<&'a str>, Option<&'a str>);

fn entry(input: &str) -> LResult<'_, &str> {
    take_till1(|c| c == ';').parse(input)
}

fn field(input: &str) -> LResult<'_, &str> {
    preceded(char(';'), take_till(|c| c == ';')).parse(input)
}

fn remainder(input: &str) -> LResult<'_, &str> {
    preceded(char(';'), rest).parse(input)
}

fn fields(input: &str) -> LResult<'_, Fields<'_>> {
    all_consuming((entry, opt(field), opt(remainder))).parse(input)
}

fn parse_score(s: &str) -> Option<u32> {
    all_consuming(score::<&str, nom::error::Error<&str>>)
        .parse(s.trim())
        .ok()
        .map(|(_, n)| n)
}

/// Interpret one non-comment line as `(candidate, clue)`.
fn parse_line(line: &str) -> Option<(Candidate, Option<&str>)> {
    let (_, (word, second, third)) = fields(line).ok()?;
    let word = word.trim();
    if word.is_empty() {
        return None;
    }
    let (score, clue) = match (second, third) {
        (None, _) => (None, None),
        (Some(s), Some(clue)) if s.trim().is_empty() => (None, Some(clue)),
        (Some(s), Some(clue)) => (Some(parse_score(s)?), Some(clue)),
        (Some(s), None) => match parse_score(s) {
            Some(n) => (Some(n), None),
            None => (None, Some(s)),
        },
    };
    let candidate = Candidate { text: word.to_string(), score };
    Some((candidate, clue.map(str::trim).filter(|c| !c.is_empty())))
}

/// Candidates in file order plus the clues found alongside them.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    pub candidates: Vec<Candidate>,
    pub clues: ClueMap,
    /// Non-blank, non-comment lines that could not be parsed.
    pub skipped: usize,
}

impl WordList {
    /// Parse a word list from an in-memory string.
    ///
    /// This never fails: malformed lines are counted in `skipped`. Word validity
    /// (length, letters) is checked later, when the words are prepared.
    pub fn parse_from_str(contents: &str) -> WordList {
        let mut list = WordList::default();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some((candidate, clue)) => {
                    list.clues.insert(&candidate.text, clue.unwrap_or_default());
                    list.candidates.push(candidate);
                }
                None => {
                    debug!("skipping malformed word-list line: {line}");
                    list.skipped += 1;
                }
            }
        }
        list
    }

    /// Native-only convenience method: read from a file path and parse.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::WordListIo`] if the file cannot be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<WordList, GeneratorError> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|source| GeneratorError::WordListIo {
            path: path_ref.display().to_string(),
            source,
        })?;
        Ok(Self::parse_from_str(&data))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_forms() {
        let input = "PYTHON;90;Language named after a comedy troupe\n\
                     LOOP;;Repeating control structure\n\
                     array;70\n\
                     TYPE;Kind of value\n\
                     stack";
        let list = WordList::parse_from_str(input);
        assert_eq!(
            list.candidates,
            vec![
                Candidate::with_score("PYTHON", 90),
                Candidate::new("LOOP"),
                Candidate::with_score("array", 70),
                Candidate::new("TYPE"),
                Candidate::new("stack"),
            ]
        );
        assert_eq!(list.clues.lookup("python").as_str(), "Language named after a comedy troupe");
        assert_eq!(list.clues.lookup("loop").as_str(), "Repeating control structure");
        assert!(list.clues.lookup("array").is_missing());
        assert_eq!(list.clues.lookup("type").as_str(), "Kind of value");
        assert_eq!(list.skipped, 0);
    }

    #[test]
    fn test_clue_may_contain_semicolons() {
        let list = WordList::parse_from_str("LOOP;5;for; while; loop");
        assert_eq!(list.clues.lookup("LOOP").as_str(), "for; while; loop");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let list = WordList::parse_from_str("# header\n\n   \nLOOP\n  # indented comment\n");
        assert_eq!(list.len(), 1);
        assert_eq!(list.skipped, 0);
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn test_malformed_lines_are_counted() {
            // empty entry, and a non-numeric score in the three-field form
            let list = WordList::parse_from_str(";50\nLOOP;abc;clue\nTYPE");
            assert_eq!(list.candidates, vec![Candidate::new("TYPE")]);
            assert_eq!(list.skipped, 2);
        }

        #[test]
        fn test_whitespace_around_fields() {
            let list = WordList::parse_from_str("  loop ; 12 ;  Circle  ");
            assert_eq!(list.candidates, vec![Candidate::with_score("loop", 12)]);
            assert_eq!(list.clues.lookup("loop").as_str(), "Circle");
        }

        #[test]
        fn test_empty_clue_is_missing() {
            let list = WordList::parse_from_str("LOOP;3;   \nloop;;Circle");
            assert!(list.clues.lookup("LOOP").is_missing());
            assert_eq!(list.candidates[0].score, Some(3));
        }

        #[test]
        fn test_empty_input() {
            let list = WordList::parse_from_str("");
            assert!(list.is_empty());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod error_tests {
        use super::*;

        #[test]
        fn test_missing_file() {
            let err = WordList::load_from_path("/definitely/not/here.txt").unwrap_err();
            assert_eq!(err.code(), "G004");
            assert!(err.to_string().contains("/definitely/not/here.txt"));
        }
    }
}

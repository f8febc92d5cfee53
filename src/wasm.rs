use crate::clues::ClueMap;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::generator::generate;
use crate::log::init_logger;
use crate::prepare::Candidate;
use crate::serialize::{PuzzleData, Variant};
use crate::word_list::WordList;
use wasm_bindgen::prelude::*;

use serde_wasm_bindgen::to_value;

/// Structured error information for JavaScript consumers
#[derive(serde::Serialize)]
struct WasmError {
    /// Error code (e.g., "G001", "WASM002")
    code: String,
    /// Display message
    message: String,
    /// Short description of error type
    description: String,
    /// Detailed explanation
    details: String,
    /// Optional helpful suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl From<GeneratorError> for WasmError {
    fn from(e: GeneratorError) -> Self {
        WasmError {
            code: e.code().to_string(),
            message: e.to_string(),
            description: e.description().to_string(),
            details: e.details().to_string(),
            help: e.help().map(str::to_string),
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(e: WasmError) -> Self {
        let mut msg = format!("Error {}: {}", e.code, e.message);

        if !e.details.is_empty() {
            msg.push_str(&format!("\n\n{}", e.details));
        }

        if let Some(help) = e.help {
            msg.push_str(&format!("\n\nSuggestion: {help}"));
        }

        js_sys::Error::new(&msg).into()
    }
}

fn serialization_error(code: &str, what: &str, e: &serde_wasm_bindgen::Error) -> WasmError {
    WasmError {
        code: code.to_string(),
        message: format!("serialization failed: {e}"),
        description: format!("Failed to serialize {what}"),
        details: format!("The {what} could not be converted to JavaScript format."),
        help: Some("This is an internal error. Please report this issue.".to_string()),
    }
}

/// Initialize crossgrid logging with the specified debug setting.
///
/// This function must be called from JavaScript after the WASM module loads.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    console_error_panic_hook::set_once();
    init_logger(debug_enabled);
    log::info!("WASM module initialized");
}

/// One `(word, clue)` pair as passed from JavaScript. `clue` and `score` are optional.
#[derive(serde::Deserialize)]
struct WasmEntry {
    word: String,
    #[serde(default)]
    clue: Option<String>,
    #[serde(default)]
    score: Option<u32>,
}

#[derive(serde::Serialize)]
struct WasmPuzzle {
    puzzle: PuzzleData,
    warnings: Vec<String>,
    symmetry_relaxed: bool,
    budget_exhausted: bool,
}

/// JS entry: `(entries: {word, clue?, score?}[], title: string, answer_key: boolean)`
/// returns `{ puzzle, warnings, symmetry_relaxed, budget_exhausted }`
#[wasm_bindgen]
pub fn generate_puzzle_wasm(entries: JsValue, title: &str, answer_key: bool) -> Result<JsValue, JsValue> {
    let entries: Vec<WasmEntry> = serde_wasm_bindgen::from_value(entries).map_err(|e| WasmError {
        code: "WASM001".to_string(),
        message: format!("entries must be {{word, clue}}[]: {e}"),
        description: "Invalid entries format".to_string(),
        details: "The entries parameter must be a JavaScript array of objects with a `word` string and optional `clue` string and `score` number.".to_string(),
        help: Some("Pass e.g. [{word: 'python', clue: 'A snake'}, {word: 'loop'}]".to_string()),
    })?;

    let candidates: Vec<Candidate> = entries
        .iter()
        .map(|e| Candidate { text: e.word.clone(), score: e.score })
        .collect();
    let clues: ClueMap = entries
        .iter()
        .map(|e| (e.word.as_str(), e.clue.as_deref().unwrap_or_default()))
        .collect();

    let config = GeneratorConfig::default().with_title(title);
    let puzzle = generate(&candidates, &clues, &config).map_err(WasmError::from)?;

    let variant = if answer_key { Variant::AnswerKey } else { Variant::Student };
    let result = WasmPuzzle {
        puzzle: puzzle.to_data(variant),
        warnings: puzzle.warnings.iter().map(|w| format!("{} ({})", w, w.code())).collect(),
        symmetry_relaxed: puzzle.symmetry_relaxed,
        budget_exhausted: puzzle.budget_exhausted,
    };

    to_value(&result).map_err(|e| serialization_error("WASM002", "puzzle", &e).into())
}

#[derive(serde::Serialize)]
struct WasmWordList {
    entries: Vec<WasmParsedEntry>,
    skipped: usize,
}

#[derive(serde::Serialize)]
struct WasmParsedEntry {
    word: String,
    score: Option<u32>,
    clue: String,
}

/// Parse word-list text (`ENTRY[;SCORE][;CLUE]` per line) into
/// `{ entries: {word, score, clue}[], skipped }`.
#[wasm_bindgen]
pub fn parse_word_list(text: &str) -> Result<JsValue, JsValue> {
    let list = WordList::parse_from_str(text);
    let result = WasmWordList {
        entries: list
            .candidates
            .iter()
            .map(|c| WasmParsedEntry {
                word: c.text.clone(),
                score: c.score,
                clue: list.clues.lookup(&c.text).as_str().to_string(),
            })
            .collect(),
        skipped: list.skipped,
    };
    to_value(&result).map_err(|e| serialization_error("WASM003", "word list", &e).into())
}

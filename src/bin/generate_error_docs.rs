//! Generate error code documentation from the source of truth (error enums).
//!
//! This binary reads the error codes, descriptions, details, and help text
//! directly from the `GeneratorError` and `DataError` implementations via their
//! `code()`, `description()`, `details()`, and `help()` methods, and lists the
//! warning codes from sample `Warning` values.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use std::io;

use crossgrid::errors::{DataError, DropReason, GeneratorError, RejectReason, Warning};
use crossgrid::grid::{Direction, Position};

/// Macro to generate error documentation for any error type
/// with `code()`, `description()`, `details()`, `help()`, and `display_detailed()` methods
macro_rules! generate_error_docs {
    ($errors:expr) => {
        for error in $errors {
            println!("### {}: {}\n", error.code(), error.description());
            println!("**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                println!("**How to fix:**");
                println!("```");
                println!("{}", help_text);
                println!("```\n");
            }

            println!("**Example error message:**");
            println!("```");
            println!("{}", error);
            println!("```\n");

            println!("**Detailed format:**");
            println!("```");
            println!("{}", error.display_detailed());
            println!("```\n");

            println!("---\n");
        }
    };
}

/// Helper to create all `GeneratorError` variants for documentation
fn all_generator_error_variants() -> Vec<GeneratorError> {
    vec![
        GeneratorError::InsufficientWords { valid: 1, required: 2 },
        GeneratorError::UnplaceableWords {
            dropped: vec!["AAAA".to_string(), "BBBB".to_string()],
            total: 3,
        },
        GeneratorError::InvalidConfig { reason: "attempt budget must be positive".to_string() },
        GeneratorError::WordListIo {
            path: "words.txt".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        },
    ]
}

/// Helper to create all `DataError` variants for documentation
fn all_data_error_variants() -> Vec<DataError> {
    vec![
        DataError::RaggedGrid { row: 2, expected: 9, found: 8 },
        DataError::SizeMismatch { rows: 9, cols: 9, found_rows: 8 },
        DataError::UnknownCell { ch: '?', row: 0, col: 3 },
        DataError::AnswerOutOfBounds { number: 4, direction: Direction::Down },
        DataError::ConflictingAnswer { row: 3, col: 5 },
        // Json--create by parsing invalid JSON
        DataError::Json(serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()),
    ]
}

fn all_warning_variants() -> Vec<Warning> {
    vec![
        Warning::Rejected { word: "C++".to_string(), reason: RejectReason::NonAlphabetic },
        Warning::Duplicate { word: "LOOP".to_string() },
        Warning::MissingClue { word: "TYPE".to_string() },
        Warning::Dropped { word: "ZEBRA".to_string(), rank: 7, reason: DropReason::Unplaceable },
        Warning::GridOverflow { budget: 20_000 },
        Warning::SymmetryRelaxed { asymmetric_cells: vec![Position::new(0, 2), Position::new(1, 2)] },
        Warning::GridResized { requested: 5, actual: 9 },
        Warning::UnclaimedRun { answer: "OPTS".to_string(), direction: Direction::Across, start: Position::new(4, 1) },
    ]
}

fn main() {
    println!("# Error Code Reference\n");
    println!("**⚠️ This document is auto-generated from the source code. Do not edit manually.**\n");

    println!("## Table of Contents\n");
    println!("- [Generator Errors (G001–G004)](#generator-errors)");
    println!("- [Puzzle Data Errors (D001–D006)](#puzzle-data-errors)");
    println!("- [Warnings (W001–W008)](#warnings)\n");

    println!("## Generator Errors\n");
    println!("Fatal errors from a generation request.\n");
    generate_error_docs!(all_generator_error_variants());

    println!("## Puzzle Data Errors\n");
    println!("Errors raised when rebuilding a grid from serialized puzzle data.\n");
    generate_error_docs!(all_data_error_variants());

    println!("## Warnings\n");
    println!("Non-fatal conditions attached to a finished puzzle.\n");
    println!("| Code | Example |");
    println!("|------|---------|");
    for warning in all_warning_variants() {
        println!("| {} | {} |", warning.code(), warning);
    }
    println!();

    println!("## Error Display Formats\n");
    println!("### Simple Format");
    println!("```");
    println!("Error: <message>");
    println!("```\n");
    println!("### Detailed Format (via `display_detailed()`)");
    println!("```");
    println!("<message> (<code>)");
    println!("<help text if available>");
    println!("```\n");
}

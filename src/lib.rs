// Reusable library API: visible to both CLI and WASM builds
pub mod board;
pub mod clues;
pub mod config;
pub mod errors;
pub mod generator;
pub mod grid;
pub mod log;
pub mod numbering;
pub mod prepare;
pub mod puzzle;
pub mod search;
pub mod serialize;
pub mod validate;
pub mod word_list;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use clues::{Clue, ClueMap};
pub use config::{AdjacencyPolicy, GeneratorConfig};
pub use errors::{GeneratorError, Warning};
pub use generator::{generate, generate_from_pairs};
pub use grid::{Cell, Direction, Grid, Position};
pub use prepare::Candidate;
pub use puzzle::Puzzle;
pub use serialize::{PuzzleData, Variant};
pub use word_list::WordList;

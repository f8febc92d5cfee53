use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crossgrid::config::{AdjacencyPolicy, GeneratorConfig, DEFAULT_ATTEMPT_BUDGET, DEFAULT_TITLE};
use crossgrid::errors::GeneratorError;
use crossgrid::generator::generate;
use crossgrid::serialize::Variant;
use crossgrid::word_list::WordList;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Build a crossword from a word list and print it as JSON
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Cli {
    /// Word list file (ENTRY[;SCORE][;CLUE] per line)
    word_file: String,

    /// Puzzle title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Fixed grid side (default: computed from the words)
    #[arg(short, long)]
    size: Option<usize>,

    /// Maximum number of candidate placements to evaluate
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPT_BUDGET)]
    budget: usize,

    /// Fail if any word cannot be placed
    #[arg(long)]
    strict: bool,

    /// Keep only the highest-priority N words
    #[arg(short = 'n', long)]
    max_words: Option<usize>,

    /// Reject any unintended run of letters, not just 2- and 3-letter fragments
    #[arg(long)]
    strict_adjacency: bool,

    /// Keep the full board instead of cropping to the letters
    #[arg(long)]
    no_trim: bool,

    /// Print the answer key instead of the student grid
    #[arg(short, long)]
    answer_key: bool,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default()
            .with_title(self.title.clone())
            .with_attempt_budget(self.budget)
            .with_strict(self.strict)
            .with_trim(!self.no_trim);
        if let Some(side) = self.size {
            config = config.with_grid_side(side);
        }
        if let Some(n) = self.max_words {
            config = config.with_max_words(n);
        }
        if self.strict_adjacency {
            config = config.with_adjacency(AdjacencyPolicy::Strict);
        }
        config
    }
}

/// Entry point of the crossgrid CLI.
///
/// Delegates to [`try_main`] and prints any error with its code and help text
/// before exiting with code 1.
fn main() -> ExitCode {
    let debug_enabled = std::env::var("CROSSGRID_DEBUG").is_ok();
    crossgrid::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        if let Some(gen_err) = e.downcast_ref::<GeneratorError>() {
            eprintln!("Error: {}", gen_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load the word list, generate the puzzle, print JSON on stdout and
/// warnings plus a summary on stderr.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.config();

    let word_list = WordList::load_from_path(&cli.word_file)?;
    if word_list.skipped > 0 {
        eprintln!("Skipped {} malformed line(s) in {}", word_list.skipped, cli.word_file);
    }

    let t_generate = Instant::now();
    let puzzle = generate(&word_list.candidates, &word_list.clues, &config)?;
    let generate_secs = t_generate.elapsed().as_secs_f64();

    let variant = if cli.answer_key { Variant::AnswerKey } else { Variant::Student };
    println!("{}", puzzle.to_data(variant).to_json()?);

    for warning in &puzzle.warnings {
        eprintln!("warning[{}]: {warning}", warning.code());
    }
    eprintln!(
        "Placed {} of {} words on a {}x{} grid in {:.3}s ({} candidate evaluations).",
        puzzle.stats.placed,
        puzzle.stats.placed + puzzle.stats.dropped,
        puzzle.grid.rows(),
        puzzle.grid.cols(),
        generate_secs,
        puzzle.stats.attempts
    );

    Ok(())
}

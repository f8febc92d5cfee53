//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing for a handful of word sets on *your* machine.
//! - Runs each case several times and reports the median.
//! - Optionally loads an extra word list from disk as one more case.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - Add a word list:                `cargo run --bin bench_local --release -- -w words.txt`
//! - See all flags:                  `cargo run --bin bench_local -- --help`
//!
//! NOTES
//! -----
//! - This is *not* Criterion. It's quick and convenient, not statistically rigorous.
//! - One warm-up run per case is done (not included in timing).
//! - We report the *median* over repeats (more robust than mean for small _N_).

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;
use crossgrid::config::GeneratorConfig;
use crossgrid::generator::generate;
use crossgrid::prepare::Candidate;
use crossgrid::word_list::WordList;
use crossgrid::ClueMap;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional word list file to time as an extra case
    #[arg(short, long)]
    word_list: Option<String>,

    /// Number of repeats per case (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Attempt budget per run
    #[arg(short, long, default_value_t = 20_000)]
    budget: usize,

    /// Print the grid of the last run for each case
    #[arg(short, long)]
    print: bool,
}

struct Case {
    name: String,
    candidates: Vec<Candidate>,
    clues: ClueMap,
}

impl Case {
    fn from_words(name: &str, words: &[&str]) -> Self {
        Case {
            name: name.to_string(),
            candidates: words.iter().map(|&w| Candidate::new(w)).collect(),
            clues: ClueMap::new(),
        }
    }
}

/// Edit/add new word sets here.
fn get_cases() -> Vec<Case> {
    vec![
        Case::from_words("programming-4", &["python", "loop", "array", "type"]),
        Case::from_words(
            "programming-12",
            &[
                "python", "variable", "function", "loop", "array", "string", "integer", "boolean",
                "module", "class", "object", "method",
            ],
        ),
        Case::from_words(
            "science-20",
            &[
                "photosynthesis", "chlorophyll", "molecule", "electron", "neutron", "proton", "gravity",
                "friction", "velocity", "momentum", "catalyst", "enzyme", "protein", "nucleus", "membrane",
                "organism", "habitat", "species", "fossil", "mineral",
            ],
        ),
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

const MAX_NAME_LEN: usize = 24;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = GeneratorConfig::default().with_attempt_budget(cli.budget);

    let mut cases = get_cases();
    if let Some(path) = &cli.word_list {
        let list = WordList::load_from_path(path)?;
        eprintln!("Loaded {} candidates from {path}", list.len());
        cases.push(Case { name: path.clone(), candidates: list.candidates, clues: list.clues });
    }

    // (name, median seconds, placed, total, attempts)
    let mut summary: Vec<(String, f64, usize, usize, usize)> = Vec::with_capacity(cases.len());

    for (idx, case) in cases.iter().enumerate() {
        eprintln!("\n[{:02}] {}", idx + 1, case.name);

        if let Err(e) = generate(&case.candidates, &case.clues, &config) {
            eprintln!("  ✗ Warm-up failed: {}", e.display_detailed());
            continue;
        }

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last = None;
        for rep in 0..cli.num_repeats {
            let t_generate = Instant::now();
            let result = generate(black_box(&case.candidates), &case.clues, &config);
            let secs = t_generate.elapsed().as_secs_f64();
            match result {
                Ok(puzzle) => {
                    eprintln!(
                        "  run {:>2}/{:>2}: {:.4}s ({} placed)",
                        rep + 1,
                        cli.num_repeats,
                        secs,
                        puzzle.stats.placed
                    );
                    times.push(secs);
                    last = Some(puzzle);
                }
                Err(e) => eprintln!("  ✗ Run {}/{} failed: {e}", rep + 1, cli.num_repeats),
            }
        }

        let med = median(times);
        if let Some(puzzle) = last {
            if cli.print {
                println!("{}\n", puzzle.grid);
            }
            summary.push((
                case.name.clone(),
                med,
                puzzle.stats.placed,
                puzzle.stats.placed + puzzle.stats.dropped,
                puzzle.stats.attempts,
            ));
        }
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<MAX_NAME_LEN$} | {:>10} | {:>9} | {:>8}", "case", "median (s)", "placed", "attempts");
    eprintln!("{:-<MAX_NAME_LEN$}-+-{:-<10}-+-{:-<9}-+-{:-<8}", "", "", "", "");
    for (name, med, placed, total, attempts) in &summary {
        let display = if name.chars().count() > MAX_NAME_LEN {
            // "- 1" for the "…"
            format!("{}…", name.chars().take(MAX_NAME_LEN - 1).collect::<String>())
        } else {
            name.clone()
        };
        let placed_str = format!("{placed}/{total}");
        eprintln!("{display:<MAX_NAME_LEN$} | {med:>10.4} | {placed_str:>9} | {attempts:>8}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), 0.0);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
    }
}

//! Hello Mutation Fuzzer

use clap::Parser;
use log::{error, info};
use quic_mutator_fuzzing::harness::{HandshakeHarness, HarnessConfig};
use quic_mutator_fuzzing::reporters::report_results;
use quic_mutator_fuzzing::utils::save_to_corpus;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "fuzz_hello", about = "Fuzz the QUIC hello mutation validator and engine")]
struct Args {
    /// Number of generated cases (defaults to the mode's iteration count)
    #[arg(long)]
    iterations: Option<usize>,

    /// RNG seed (defaults to QUIC_FUZZING_SEED, then a random seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Save accepted generated cases into the corpus directory
    #[arg(long)]
    save_corpus: bool,

    /// Replay the corpus directory before generating new cases
    #[arg(long)]
    replay: bool,

    /// Log every case outcome
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let config = match quic_mutator_fuzzing::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to initialise fuzzing: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let args = Args::parse();

    let iterations = args.iterations.unwrap_or(config.max_iterations);
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!("Seed: {}", seed);

    let mut harness = HandshakeHarness::new(
        HarnessConfig {
            verbose: args.verbose,
            ..Default::default()
        },
        seed,
    );

    let started = Instant::now();
    let mut results = Vec::new();

    if args.replay {
        match harness.run_corpus(&config.corpus_dir) {
            Ok(replayed) => results.extend(replayed),
            Err(err) => {
                error!("Failed to replay corpus: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    for iteration in 0..iterations {
        let (case, outcome) = harness.run_generated();

        if args.save_corpus && case.expect_valid() && !outcome.is_violation() {
            if let Err(err) = save_to_corpus(&config.corpus_dir, &case.to_text()) {
                error!("Failed to save corpus entry: {}", err);
            }
        }
        results.push((format!("generated-{}", iteration), outcome));
    }

    info!(
        "Ran {} cases in {}",
        results.len(),
        humantime::format_duration(started.elapsed())
    );

    match report_results(&results, Some(config.artifacts_dir.as_path())) {
        Ok(summary) if summary.is_clean() => {
            println!("Hello mutation fuzzing completed successfully");
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!("Failed to write report: {}", err);
            ExitCode::FAILURE
        }
    }
}

//! Parse a mutation list and optionally apply it to sample hello messages

use clap::Parser;
use quic_mutator::{AdditionalPacket, Engine, MutationList};
use quic_mutator_fuzzing::constants::SAMPLE_MUTATION_LIST;
use quic_mutator_fuzzing::generators::{ClientHelloGenerator, Generator, ServerHelloGenerator};
use quic_mutator_fuzzing::FuzzError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mutate_hello", about = "Validate a QUIC hello mutation list")]
struct Args {
    /// Mutation list as inline JSON
    #[arg(long, conflicts_with = "file")]
    spec: Option<String>,

    /// Read the mutation list from a test-case file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Apply the list to sample ClientHello / ServerHello messages and print them
    #[arg(long)]
    apply: bool,

    /// Seed for the sample messages
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let raw = match read_input(&args) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error reading mutation list: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mutations = match quic_mutator::parse(&raw) {
        Ok(mutations) => mutations,
        Err(err) => {
            eprintln!("Error parsing mutation parameters: {}", err);
            return ExitCode::FAILURE;
        }
    };
    println!("Parsed {} mutation descriptors successfully", mutations.len());

    if args.apply {
        if let Err(err) = apply_to_samples(&mutations, args.seed) {
            eprintln!("Error printing mutated messages: {}", err);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn read_input(args: &Args) -> Result<String, FuzzError> {
    if let Some(spec) = &args.spec {
        return Ok(spec.clone());
    }
    if let Some(path) = &args.file {
        return Ok(fs::read_to_string(path)?);
    }
    Ok(SAMPLE_MUTATION_LIST.to_string())
}

fn apply_to_samples(mutations: &MutationList, seed: u64) -> Result<(), FuzzError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut client = ClientHelloGenerator::with_populate_ratio(1.0).generate(&mut rng);
    let mut server = ServerHelloGenerator::with_populate_ratio(1.0).generate(&mut rng);

    let mut packets: Vec<AdditionalPacket> = Vec::new();
    let mut engine = Engine::with_sink(&mut packets);
    engine.apply_to_client(&mut client, mutations);
    engine.apply_to_server(&mut server, mutations);

    println!("ClientHello:\n{}", serde_json::to_string_pretty(&client)?);
    println!("ServerHello:\n{}", serde_json::to_string_pretty(&server)?);
    if !packets.is_empty() {
        println!("Additional packets:\n{}", serde_json::to_string_pretty(&packets)?);
    }

    Ok(())
}

// QUIC Hello Mutation Fuzzing Infrastructure
// Core library definition

pub mod constants;
pub mod error;
pub mod utils;

// Core modules
pub mod generators;
pub mod harness;
pub mod mutators;
pub mod reporters;

// Re-exports for convenience
pub use error::FuzzError;
pub use utils::{FuzzConfig, FuzzMode};

/// Initialize the fuzzing infrastructure
///
/// Reads configuration from the environment and sets up logging. `RUST_LOG`
/// takes precedence over the level implied by the fuzzing mode. Should be
/// called at the start of each fuzzing binary.
pub fn init() -> Result<FuzzConfig, FuzzError> {
    let config = FuzzConfig::from_env()?;

    let default_level = config.mode.log_level().to_string().to_lowercase();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();

    log::info!(
        "Fuzzing mode: {:?}, max iterations: {}",
        config.mode,
        config.max_iterations
    );
    Ok(config)
}

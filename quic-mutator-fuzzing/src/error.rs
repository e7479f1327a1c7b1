use quic_mutator::InvalidMutationSpec;
use thiserror::Error;

/// Error types for fuzzing runs
#[derive(Error, Debug)]
pub enum FuzzError {
    /// Corpus or artifact I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A test case was rejected by the validator
    #[error("Invalid mutation list: {0}")]
    InvalidSpec(#[from] InvalidMutationSpec),

    /// Encoding a list or report failed
    #[error("Failed to serialize: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Byte-driven generation ran out of input or hit an invalid choice
    #[error("Failed to generate input: {0}")]
    Generation(#[from] arbitrary::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

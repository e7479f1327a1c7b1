// quic-mutator-fuzzing/src/constants.rs
//! Shared constants for the fuzzing infrastructure

/// Maximum number of iterations for a fuzzing run
pub const MAX_ITERATIONS: usize = 10000;

/// Default corpus directory
pub const DEFAULT_CORPUS_DIR: &str = "./fuzzing-corpus/hello";

/// Default artifact directory
pub const DEFAULT_ARTIFACT_DIR: &str = "./fuzzing-artifacts/hello";

/// Upper bound on descriptors in a generated mutation list
pub const DEFAULT_MAX_MUTATIONS: usize = 8;

/// Share of generated cases that are deliberately invalid
pub const DEFAULT_INVALID_RATIO: f64 = 0.2;

/// Probability that a generated hello populates a given field
pub const DEFAULT_POPULATE_RATIO: f64 = 0.8;

/// Name of the results file written to the artifact directory
pub const RESULTS_FILE: &str = "hello_mutation_results.json";

/// Two-entry list used by `mutate_hello` when no input is given
pub const SAMPLE_MUTATION_LIST: &str = r#"
[
    {
        "mutation": "remove_field",
        "target": "client",
        "fields": {
            "field_name": "alpn_protocols"
        }
    },
    {
        "mutation": "modify_field",
        "target": "server",
        "fields": {
            "field_name": "random",
            "new_value": "deadbeef"
        }
    }
]
"#;

/// Environment variables
pub mod env {
    pub const MODE: &str = "QUIC_FUZZING_MODE";
    pub const MAX_ITERATIONS: &str = "QUIC_FUZZING_MAX_ITERATIONS";
    pub const CORPUS_DIR: &str = "QUIC_FUZZING_CORPUS_DIR";
    pub const ARTIFACTS_DIR: &str = "QUIC_FUZZING_ARTIFACTS_DIR";
    pub const SEED: &str = "QUIC_FUZZING_SEED";
}

/// Fuzzing modes
pub mod modes {
    /// Standard fuzzing mode
    pub const STANDARD: &str = "standard";
    /// Quick fuzzing mode (fewer iterations)
    pub const QUICK: &str = "quick";
    /// Thorough fuzzing mode (more iterations)
    pub const THOROUGH: &str = "thorough";
    /// CI mode (optimized for continuous integration)
    pub const CI: &str = "ci";
    /// Debug mode (extra logging)
    pub const DEBUG: &str = "debug";
}

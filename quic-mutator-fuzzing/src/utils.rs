// quic-mutator-fuzzing/src/utils.rs
//! Environment-driven configuration and corpus helpers

use crate::constants::{self, env as vars, modes};
use crate::error::FuzzError;
use log::{debug, warn, LevelFilter};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

/// How aggressive a fuzzing run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuzzMode {
    #[default]
    Standard,
    Quick,
    Thorough,
    Ci,
    Debug,
}

impl FuzzMode {
    pub fn default_iterations(&self) -> usize {
        match self {
            FuzzMode::Quick => 1000,
            FuzzMode::Thorough => 50000,
            FuzzMode::Ci => 5000,
            FuzzMode::Standard | FuzzMode::Debug => constants::MAX_ITERATIONS,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self {
            FuzzMode::Debug => LevelFilter::Debug,
            FuzzMode::Ci => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }
}

impl FromStr for FuzzMode {
    type Err = FuzzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            modes::STANDARD => Ok(FuzzMode::Standard),
            modes::QUICK => Ok(FuzzMode::Quick),
            modes::THOROUGH => Ok(FuzzMode::Thorough),
            modes::CI => Ok(FuzzMode::Ci),
            modes::DEBUG => Ok(FuzzMode::Debug),
            other => Err(FuzzError::Config(format!("unknown fuzzing mode '{other}'"))),
        }
    }
}

/// Settings for a fuzzing run, read from `QUIC_FUZZING_*` variables
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    pub mode: FuzzMode,
    pub max_iterations: usize,
    pub corpus_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    /// Fixed RNG seed; a fresh one is drawn when unset
    pub seed: Option<u64>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        let mode = FuzzMode::default();
        Self {
            mode,
            max_iterations: mode.default_iterations(),
            corpus_dir: PathBuf::from(constants::DEFAULT_CORPUS_DIR),
            artifacts_dir: PathBuf::from(constants::DEFAULT_ARTIFACT_DIR),
            seed: None,
        }
    }
}

impl FuzzConfig {
    pub fn from_env() -> Result<Self, FuzzError> {
        let mode = match env::var(vars::MODE) {
            Ok(mode) => mode.parse()?,
            Err(_) => FuzzMode::default(),
        };

        let max_iterations = parse_var(vars::MAX_ITERATIONS)?.unwrap_or(mode.default_iterations());
        let seed = parse_var(vars::SEED)?;

        Ok(Self {
            mode,
            max_iterations,
            corpus_dir: env::var(vars::CORPUS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_CORPUS_DIR)),
            artifacts_dir: env::var(vars::ARTIFACTS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(constants::DEFAULT_ARTIFACT_DIR)),
            seed,
        })
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, FuzzError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| FuzzError::Config(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// Get a timestamp string for file naming
pub fn get_timestamp_string() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs();

    format!("{}", now)
}

static FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Create a unique file name with timestamp
pub fn create_timestamped_filename(prefix: &str, extension: &str) -> String {
    let n = FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}.{}", prefix, get_timestamp_string(), n, extension)
}

/// Write one mutation-list test case into `dir`, creating it if needed
pub fn save_to_corpus(dir: &Path, text: &str) -> Result<PathBuf, FuzzError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(create_timestamped_filename("case", "json"));
    fs::write(&path, text)?;
    debug!("Saved corpus entry {}", path.display());
    Ok(path)
}

/// Load every `*.json` test case in `dir`, sorted by path.
///
/// A missing directory yields an empty corpus; unreadable files are skipped.
pub fn load_corpus(dir: &Path) -> Result<Vec<(PathBuf, String)>, FuzzError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut corpus = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(text) => corpus.push((path, text)),
            Err(err) => warn!("Skipping unreadable corpus entry {}: {}", path.display(), err),
        }
    }

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("quick".parse::<FuzzMode>().unwrap(), FuzzMode::Quick);
        assert_eq!("ci".parse::<FuzzMode>().unwrap().log_level(), LevelFilter::Error);
        assert_eq!(FuzzMode::Thorough.default_iterations(), 50000);
        assert!("turbo".parse::<FuzzMode>().is_err());
    }

    #[test]
    fn test_corpus_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_dir = dir.path().join("cases");

        assert!(load_corpus(&corpus_dir).unwrap().is_empty());

        let first = save_to_corpus(&corpus_dir, "[]").unwrap();
        let second = save_to_corpus(&corpus_dir, "[{}]").unwrap();
        assert_ne!(first, second);
        fs::write(corpus_dir.join("notes.txt"), "ignored").unwrap();

        let corpus = load_corpus(&corpus_dir).unwrap();
        assert_eq!(corpus.len(), 2);
        let texts: Vec<_> = corpus.iter().map(|(_, text)| text.as_str()).collect();
        assert!(texts.contains(&"[]"));
        assert!(texts.contains(&"[{}]"));
    }
}

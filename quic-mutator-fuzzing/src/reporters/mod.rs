// quic-mutator-fuzzing/src/reporters/mod.rs
//! Reporters for summarising fuzzing results

use crate::constants::RESULTS_FILE;
use crate::error::FuzzError;
use crate::harness::CaseOutcome;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Aggregate counts over a set of case outcomes
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub applied: usize,
    pub rejected: usize,
    pub violations: usize,
    pub additional_packets: usize,
    /// Case name and reason for every violation
    pub failures: Vec<(String, String)>,
}

impl Summary {
    pub fn is_clean(&self) -> bool {
        self.violations == 0
    }
}

pub fn summarize(results: &[(String, CaseOutcome)]) -> Summary {
    let mut summary = Summary {
        total: results.len(),
        ..Default::default()
    };

    for (name, outcome) in results {
        match outcome {
            CaseOutcome::Applied {
                additional_packets, ..
            } => {
                summary.applied += 1;
                summary.additional_packets += additional_packets;
            }
            CaseOutcome::Rejected(_) => summary.rejected += 1,
            CaseOutcome::InvariantViolation(reason) => {
                summary.violations += 1;
                summary.failures.push((name.clone(), reason.clone()));
            }
        }
    }

    summary
}

/// Print a summary of hello mutation results and, when `artifacts_dir` is
/// given, write the per-case outcomes there as JSON.
pub fn report_results(
    results: &[(String, CaseOutcome)],
    artifacts_dir: Option<&Path>,
) -> Result<Summary, FuzzError> {
    let summary = summarize(results);

    println!("\n=== Hello Mutation Fuzzing Results ===");
    println!("Total cases: {}", summary.total);
    println!("  Applied: {}", summary.applied);
    println!("  Rejected: {}", summary.rejected);
    println!("  Invariant violations: {}", summary.violations);
    println!("Additional packets requested: {}", summary.additional_packets);

    if !summary.failures.is_empty() {
        println!("\nFailures:");
        for (name, reason) in &summary.failures {
            println!("  {}: {}", name, reason);
        }
    }

    if let Some(dir) = artifacts_dir {
        let path = write_results(dir, &summary, results)?;
        println!("Results saved to {}", path.display());
    }

    Ok(summary)
}

#[derive(Serialize)]
struct ResultsFile<'a> {
    summary: &'a Summary,
    cases: Vec<CaseRecord<'a>>,
}

#[derive(Serialize)]
struct CaseRecord<'a> {
    name: &'a str,
    #[serde(flatten)]
    outcome: &'a CaseOutcome,
}

fn write_results(
    dir: &Path,
    summary: &Summary,
    results: &[(String, CaseOutcome)],
) -> Result<PathBuf, FuzzError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(RESULTS_FILE);

    let file = ResultsFile {
        summary,
        cases: results
            .iter()
            .map(|(name, outcome)| CaseRecord { name, outcome })
            .collect(),
    };
    fs::write(&path, serde_json::to_string_pretty(&file)?)?;
    info!("Wrote {} case results to {}", results.len(), path.display());

    Ok(path)
}

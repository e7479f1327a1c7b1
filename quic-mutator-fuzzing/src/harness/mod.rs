// quic-mutator-fuzzing/src/harness/mod.rs
//! Harness that replays mutation lists against generated hello messages and
//! checks the engine's guarantees on every case.

use crate::constants::{DEFAULT_INVALID_RATIO, DEFAULT_MAX_MUTATIONS, DEFAULT_POPULATE_RATIO};
use crate::error::FuzzError;
use crate::generators::{
    ClientHelloGenerator, GeneratedCase, Generator, MutationListGenerator, ServerHelloGenerator,
};
use crate::utils::load_corpus;
use log::{debug, info, warn};
use quic_mutator::{AdditionalPacket, Engine, HelloFields, MutationAction, MutationKind, MutationList};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;

/// Harness configuration options
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Log every case outcome at info level
    pub verbose: bool,
    /// Upper bound on descriptors per generated list
    pub max_mutations: usize,
    /// Share of generated lists carrying a deliberate defect
    pub invalid_ratio: f64,
    /// Probability a generated hello populates each field
    pub populate_ratio: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            max_mutations: DEFAULT_MAX_MUTATIONS,
            invalid_ratio: DEFAULT_INVALID_RATIO,
            populate_ratio: DEFAULT_POPULATE_RATIO,
        }
    }
}

/// What happened to one test case
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Parsed and applied to both hellos with every check passing
    Applied {
        descriptors: usize,
        additional_packets: usize,
    },
    /// The validator refused the list, as expected for this case
    Rejected(String),
    /// A guarantee was broken
    InvariantViolation(String),
}

impl CaseOutcome {
    pub fn is_violation(&self) -> bool {
        matches!(self, CaseOutcome::InvariantViolation(_))
    }
}

pub struct HandshakeHarness {
    config: HarnessConfig,
    lists: MutationListGenerator,
    clients: ClientHelloGenerator,
    servers: ServerHelloGenerator,
    rng: StdRng,
}

impl HandshakeHarness {
    pub fn new(config: HarnessConfig, seed: u64) -> Self {
        Self {
            lists: MutationListGenerator::with_limits(config.max_mutations, config.invalid_ratio),
            clients: ClientHelloGenerator::with_populate_ratio(config.populate_ratio),
            servers: ServerHelloGenerator::with_populate_ratio(config.populate_ratio),
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Validate `raw` and, if accepted, exercise it against fresh hellos
    pub fn run_text(&mut self, raw: &str) -> CaseOutcome {
        let outcome = match quic_mutator::parse(raw) {
            Ok(list) => self.exercise(&list),
            Err(err) => CaseOutcome::Rejected(err.to_string()),
        };
        self.log_outcome("text case", &outcome);
        outcome
    }

    /// Generate one case and check the validator's verdict against how it was built
    pub fn run_generated(&mut self) -> (GeneratedCase, CaseOutcome) {
        let case = self.lists.generate(&mut self.rng);

        let outcome = match (quic_mutator::parse_value(case.document.clone()), case.corruption) {
            (Ok(list), None) => match reparse(&list) {
                Ok(()) => self.exercise(&list),
                Err(reason) => CaseOutcome::InvariantViolation(reason),
            },
            (Ok(_), Some(corruption)) => CaseOutcome::InvariantViolation(format!(
                "validator accepted a case with {corruption:?}"
            )),
            (Err(err), None) => {
                CaseOutcome::InvariantViolation(format!("validator rejected a valid case: {err}"))
            }
            (Err(err), Some(_)) => CaseOutcome::Rejected(err.to_string()),
        };

        self.log_outcome("generated case", &outcome);
        (case, outcome)
    }

    /// Replay every test case in a corpus directory
    pub fn run_corpus(&mut self, dir: &Path) -> Result<Vec<(String, CaseOutcome)>, FuzzError> {
        let corpus = load_corpus(dir)?;
        info!("Replaying {} corpus cases from {}", corpus.len(), dir.display());

        Ok(corpus
            .into_iter()
            .map(|(path, text)| (path.display().to_string(), self.run_text(&text)))
            .collect())
    }

    fn exercise(&mut self, list: &MutationList) -> CaseOutcome {
        let client = self.clients.generate(&mut self.rng);
        let server = self.servers.generate(&mut self.rng);

        let checked = check_invariants(&client, list)
            .and_then(|client_packets| Ok(client_packets + check_invariants(&server, list)?));

        match checked {
            Ok(additional_packets) => CaseOutcome::Applied {
                descriptors: list.len(),
                additional_packets,
            },
            Err(reason) => CaseOutcome::InvariantViolation(reason),
        }
    }

    fn log_outcome(&self, label: &str, outcome: &CaseOutcome) {
        if outcome.is_violation() {
            warn!("{label}: {outcome:?}");
        } else if self.config.verbose {
            info!("{label}: {outcome:?}");
        } else {
            debug!("{label}: {outcome:?}");
        }
    }
}

fn reparse(list: &MutationList) -> Result<(), String> {
    let text = list
        .to_json_string()
        .map_err(|err| format!("failed to encode list: {err}"))?;
    match quic_mutator::parse(&text) {
        Ok(reparsed) if &reparsed == list => Ok(()),
        Ok(_) => Err("list changed across a wire round trip".to_string()),
        Err(err) => Err(format!("encoded list no longer parses: {err}")),
    }
}

/// Apply `list` to a copy of `original` and check the engine's guarantees.
///
/// Returns the number of additional packets requested for this role.
pub fn check_invariants<M>(original: &M, list: &MutationList) -> Result<usize, String>
where
    M: HelloFields + Clone + PartialEq + Debug,
{
    let role = M::ROLE;

    let mut packets: Vec<AdditionalPacket> = Vec::new();
    let mut mutated = original.clone();
    Engine::with_sink(&mut packets).apply(&mut mutated, list);

    let mut again = original.clone();
    Engine::new().apply(&mut again, list);
    if again != mutated {
        return Err(format!("{role} hello differs between two identical runs"));
    }

    Engine::new().apply(&mut again, list);
    if again != mutated {
        return Err(format!("{role} hello changed when the list was applied twice"));
    }

    // The last descriptor touching a field decides its value; everything else is untouched.
    let mut expected = original.clone();
    for field in original.exposed_fields() {
        let last = list
            .iter()
            .rev()
            .filter(|d| d.targets(role))
            .find_map(|d| match d.action() {
                MutationAction::RemoveField { field: f } if *f == field => Some(None),
                MutationAction::ModifyField { field: f, new_value } if *f == field => {
                    Some(Some(new_value.clone()))
                }
                _ => None,
            });
        if let Some(value) = last {
            expected.set(field, value);
        }
    }
    if mutated != expected {
        return Err(format!(
            "{role} hello mismatch: got {mutated:?}, expected {expected:?}"
        ));
    }

    let requested = list
        .for_target(role)
        .filter(|d| d.kind() == MutationKind::SendAdditionalPacket)
        .count();
    if packets.len() != requested || packets.iter().any(|p| p.target != role) {
        return Err(format!(
            "{role} hello requested {requested} additional packets, sink received {:?}",
            packets
        ));
    }

    Ok(packets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_MUTATION_LIST;
    use quic_mutator::{ClientHello, ServerHello};
    use serde_json::json;

    #[test]
    fn test_sample_list_applies_cleanly() {
        let mut harness = HandshakeHarness::new(HarnessConfig::default(), 5);
        let outcome = harness.run_text(SAMPLE_MUTATION_LIST);
        assert_eq!(
            outcome,
            CaseOutcome::Applied {
                descriptors: 2,
                additional_packets: 0
            }
        );
    }

    #[test]
    fn test_invalid_text_is_rejected() {
        let mut harness = HandshakeHarness::new(HarnessConfig::default(), 5);
        let outcome = harness.run_text(r#"[{"mutation": "bogus", "target": "client"}]"#);
        assert!(matches!(outcome, CaseOutcome::Rejected(_)));
        assert!(matches!(harness.run_text("not json"), CaseOutcome::Rejected(_)));
    }

    #[test]
    fn test_generated_cases_hold_invariants() {
        let config = HarnessConfig {
            invalid_ratio: 0.3,
            ..Default::default()
        };
        let mut harness = HandshakeHarness::new(config, 11);

        for _ in 0..300 {
            let (case, outcome) = harness.run_generated();
            assert!(!outcome.is_violation(), "{} -> {:?}", case.to_text(), outcome);
            assert_eq!(case.expect_valid(), matches!(outcome, CaseOutcome::Applied { .. }));
        }
    }

    #[test]
    fn test_check_invariants_counts_packets() {
        let list = quic_mutator::parse(
            r#"[
                {"mutation": "send_additional_packet", "target": "server", "fields": {"packet_type": "ServerHello", "packet_content": "02"}},
                {"mutation": "send_additional_packet", "target": "server", "fields": {"packet_type": "ClientHello", "packet_content": null}},
                {"mutation": "modify_field", "target": "client", "fields": {"field_name": "random", "new_value": "ff"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(check_invariants(&ServerHello::default(), &list), Ok(2));
        let client = ClientHello {
            random: Some(json!("00")),
            ..Default::default()
        };
        assert_eq!(check_invariants(&client, &list), Ok(0));
    }
}

// quic-mutator-fuzzing/src/generators/mutation_list.rs
//! Generators for wire-format mutation lists.
//!
//! Lists are produced as raw JSON documents rather than descriptors so that
//! every generated case goes through the validator. A configurable share of
//! cases carries exactly one deliberate defect.

use crate::constants::{DEFAULT_INVALID_RATIO, DEFAULT_MAX_MUTATIONS};
use crate::generators::{hex_bytes, BytesGenerator, Generator};
use arbitrary::Unstructured;
use quic_mutator::{FieldName, MutationKind, PacketType, Param, Target};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// The defect injected into an otherwise valid case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Corruption {
    UnknownMutation,
    UnknownTarget,
    MissingParameter,
    InvalidFieldName,
    InvalidPacketType,
}

/// A generated test case and whether the validator should accept it
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCase {
    pub document: Value,
    pub corruption: Option<Corruption>,
}

impl GeneratedCase {
    pub fn expect_valid(&self) -> bool {
        self.corruption.is_none()
    }

    pub fn to_text(&self) -> String {
        self.document.to_string()
    }
}

/// Generator for mutation-list test cases
pub struct MutationListGenerator {
    max_mutations: usize,
    invalid_ratio: f64,
}

impl MutationListGenerator {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_MUTATIONS, DEFAULT_INVALID_RATIO)
    }

    pub fn with_limits(max_mutations: usize, invalid_ratio: f64) -> Self {
        Self {
            max_mutations,
            invalid_ratio: invalid_ratio.clamp(0.0, 1.0),
        }
    }

    fn entry<R: Rng + ?Sized>(&self, rng: &mut R) -> (MutationKind, Value) {
        let kind = *MutationKind::ALL.choose(rng).unwrap_or(&MutationKind::Identity);
        let target = *Target::ALL.choose(rng).unwrap_or(&Target::Client);

        let mut fields = Map::new();
        for param in kind.required_params() {
            let value = match param {
                Param::FieldName => json!(FieldName::ALL.choose(rng).unwrap_or(&FieldName::Random)),
                Param::PacketType => json!(PacketType::ALL.choose(rng).unwrap_or(&PacketType::ClientHello)),
                Param::NewValue | Param::PacketContent => random_payload(rng),
            };
            fields.insert(param.as_str().to_string(), value);
        }
        if rng.gen_bool(0.1) {
            fields.insert("note".to_string(), json!(hex_bytes(rng, 4)));
        }

        (kind, wire_entry(kind, target, fields))
    }
}

impl Default for MutationListGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<GeneratedCase> for MutationListGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedCase {
        let len = rng.gen_range(0..=self.max_mutations);
        let mut entries: Vec<(MutationKind, Value)> = (0..len).map(|_| self.entry(rng)).collect();

        let corruption = if !entries.is_empty() && rng.gen_bool(self.invalid_ratio) {
            let index = rng.gen_range(0..entries.len());
            let (kind, entry) = &mut entries[index];
            Some(corrupt(*kind, entry, rng))
        } else {
            None
        };

        GeneratedCase {
            document: Value::Array(entries.into_iter().map(|(_, entry)| entry).collect()),
            corruption,
        }
    }
}

/// Byte-driven generation always yields valid lists
impl BytesGenerator<GeneratedCase> for MutationListGenerator {
    fn from_unstructured(&self, u: &mut Unstructured<'_>) -> arbitrary::Result<GeneratedCase> {
        let len = u.int_in_range(0..=self.max_mutations)?;
        let mut entries = Vec::with_capacity(len);

        for _ in 0..len {
            let kind = *u.choose(&MutationKind::ALL)?;
            let target = *u.choose(&Target::ALL)?;
            let mut fields = Map::new();
            for param in kind.required_params() {
                let value = match param {
                    Param::FieldName => json!(u.choose(&FieldName::ALL)?),
                    Param::PacketType => json!(u.choose(&PacketType::ALL)?),
                    Param::NewValue | Param::PacketContent => match u.int_in_range(0..=2u8)? {
                        0 => json!(u.arbitrary::<u16>()?),
                        1 => {
                            let n = u.int_in_range(0..=32usize)?.min(u.len());
                            json!(hex::encode(u.bytes(n)?))
                        }
                        _ => Value::Null,
                    },
                };
                fields.insert(param.as_str().to_string(), value);
            }
            entries.push(wire_entry(kind, target, fields));
        }

        Ok(GeneratedCase {
            document: Value::Array(entries),
            corruption: None,
        })
    }
}

fn wire_entry(kind: MutationKind, target: Target, fields: Map<String, Value>) -> Value {
    json!({
        "mutation": kind,
        "target": target,
        "fields": fields,
    })
}

fn random_payload<R: Rng + ?Sized>(rng: &mut R) -> Value {
    match rng.gen_range(0..5) {
        0 => {
            let len = rng.gen_range(0..48);
            json!(hex_bytes(rng, len))
        }
        1 => json!(rng.gen::<u16>()),
        2 => {
            let len = rng.gen_range(0..6);
            json!((0..len).map(|_| rng.gen::<u16>()).collect::<Vec<_>>())
        }
        3 => json!({"raw": hex_bytes(rng, 8), "length": rng.gen::<u8>()}),
        _ => Value::Null,
    }
}

/// Inject one defect into `entry`, picking only defects that apply to `kind`
fn corrupt<R: Rng + ?Sized>(kind: MutationKind, entry: &mut Value, rng: &mut R) -> Corruption {
    let params = kind.required_params();
    let mut options = vec![Corruption::UnknownMutation, Corruption::UnknownTarget];
    if !params.is_empty() {
        options.push(Corruption::MissingParameter);
    }
    if params.contains(&Param::FieldName) {
        options.push(Corruption::InvalidFieldName);
    }
    if params.contains(&Param::PacketType) {
        options.push(Corruption::InvalidPacketType);
    }
    let corruption = *options.choose(rng).unwrap_or(&Corruption::UnknownMutation);

    match corruption {
        Corruption::UnknownMutation => {
            entry["mutation"] = pick(rng, &[json!("bogus"), json!("Identity"), json!("remove-field"), json!(""), json!(7), Value::Null]);
        }
        Corruption::UnknownTarget => {
            entry["target"] = pick(rng, &[json!("peer"), json!("Client"), json!("both"), json!(""), Value::Null]);
        }
        Corruption::MissingParameter => {
            if let (Some(param), Some(fields)) = (params.choose(rng), entry["fields"].as_object_mut()) {
                fields.remove(param.as_str());
            }
        }
        Corruption::InvalidFieldName => {
            entry["fields"]["field_name"] = pick(rng, &[json!("not_a_real_field"), json!("cipher_suite"), json!("Random"), json!(""), json!(0)]);
        }
        Corruption::InvalidPacketType => {
            entry["fields"]["packet_type"] = pick(rng, &[json!("HelloRetry"), json!("clienthello"), json!("EncryptedExtensions"), json!("")]);
        }
    }

    corruption
}

fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[Value]) -> Value {
    choices.choose(rng).cloned().unwrap_or(Value::Null)
}

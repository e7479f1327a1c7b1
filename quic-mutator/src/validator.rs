// quic-mutator/src/validator.rs
//! Turns raw mutation-list text into typed descriptors.
//!
//! Checks run per entry in a fixed order: mutation kind, target, then each
//! required parameter in the order [`MutationKind::required_params`] lists
//! them. The first violation aborts the parse and nothing is returned.
//! `new_value` and `packet_content` are kept as opaque JSON values.

use crate::descriptor::{MutationAction, MutationDescriptor, MutationList};
use crate::error::InvalidMutationSpec;
use crate::hello::FieldValue;
use crate::schema::{FieldName, MutationKind, PacketType, Param, Target};
use log::debug;
use serde_json::{Map, Value};
use std::io::Read;
use std::str::FromStr;

/// Parse and validate a JSON mutation list
pub fn parse(raw: &str) -> Result<MutationList, InvalidMutationSpec> {
    let value: Value = serde_json::from_str(raw)?;
    parse_value(value)
}

/// Parse and validate a mutation list read from `reader` (e.g. a test-case file)
pub fn parse_reader<R: Read>(reader: R) -> Result<MutationList, InvalidMutationSpec> {
    let value: Value = serde_json::from_reader(reader)?;
    parse_value(value)
}

/// Validate an already-decoded JSON document
pub fn parse_value(value: Value) -> Result<MutationList, InvalidMutationSpec> {
    let entries = match value {
        Value::Array(entries) => entries,
        _ => return Err(InvalidMutationSpec::NotAnArray),
    };

    let descriptors = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} mutation descriptors", descriptors.len());
    Ok(MutationList::from(descriptors))
}

fn parse_entry(index: usize, entry: Value) -> Result<MutationDescriptor, InvalidMutationSpec> {
    let mut entry = match entry {
        Value::Object(entry) => entry,
        _ => return Err(InvalidMutationSpec::NotAnObject { index }),
    };

    let kind: MutationKind = parse_name(entry.get("mutation"))
        .map_err(|value| InvalidMutationSpec::UnknownMutation { index, value })?;
    let target: Target = parse_name(entry.get("target"))
        .map_err(|value| InvalidMutationSpec::UnknownTarget { index, value })?;

    let fields = match entry.remove("fields") {
        None => Map::new(),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(InvalidMutationSpec::NotAnObject { index }),
    };

    let params = Params {
        index,
        kind,
        fields: &fields,
    };
    for param in kind.required_params() {
        params.check(*param)?;
    }

    let action = match kind {
        MutationKind::Identity => MutationAction::Identity,
        MutationKind::RemoveField => MutationAction::RemoveField {
            field: params.field_name()?,
        },
        MutationKind::ModifyField => MutationAction::ModifyField {
            field: params.field_name()?,
            new_value: params.opaque(Param::NewValue)?,
        },
        MutationKind::SendAdditionalPacket => MutationAction::SendAdditionalPacket {
            packet_type: params.packet_type()?,
            packet_content: params.opaque(Param::PacketContent)?,
        },
    };

    debug!("Accepted mutation #{index}: {kind} -> {target}");
    Ok(MutationDescriptor::new(action, target, fields))
}

/// Lookups into one entry's `fields` object
struct Params<'a> {
    index: usize,
    kind: MutationKind,
    fields: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    fn check(&self, param: Param) -> Result<(), InvalidMutationSpec> {
        match param {
            Param::FieldName => self.field_name().map(drop),
            Param::PacketType => self.packet_type().map(drop),
            Param::NewValue | Param::PacketContent => self.require(param).map(drop),
        }
    }

    fn require(&self, param: Param) -> Result<&'a Value, InvalidMutationSpec> {
        self.fields
            .get(param.as_str())
            .ok_or(InvalidMutationSpec::MissingParameter {
                index: self.index,
                kind: self.kind,
                param,
            })
    }

    fn opaque(&self, param: Param) -> Result<FieldValue, InvalidMutationSpec> {
        self.require(param).cloned()
    }

    fn field_name(&self) -> Result<FieldName, InvalidMutationSpec> {
        let value = self.require(Param::FieldName)?;
        parse_name(Some(value)).map_err(|value| InvalidMutationSpec::InvalidFieldName {
            index: self.index,
            value,
        })
    }

    fn packet_type(&self) -> Result<PacketType, InvalidMutationSpec> {
        let value = self.require(Param::PacketType)?;
        parse_name(Some(value)).map_err(|value| InvalidMutationSpec::InvalidPacketType {
            index: self.index,
            value,
        })
    }
}

/// Resolve a vocabulary name; on failure returns a printable form of what was found
fn parse_name<T: FromStr>(value: Option<&Value>) -> Result<T, String> {
    match value {
        Some(Value::String(name)) => name.parse().map_err(|_| name.clone()),
        Some(other) => Err(other.to_string()),
        None => Err("<missing>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_json(value: Value) -> Result<MutationList, InvalidMutationSpec> {
        parse(&value.to_string())
    }

    #[test]
    fn test_parse_sample_list() {
        let list = parse(
            r#"
            [
                {
                    "mutation": "remove_field",
                    "target": "client",
                    "fields": {"field_name": "alpn_protocols"}
                },
                {
                    "mutation": "modify_field",
                    "target": "server",
                    "fields": {"field_name": "random", "new_value": "deadbeef"}
                }
            ]
            "#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].target(), Target::Client);
        assert_eq!(
            list[0].action(),
            &MutationAction::RemoveField {
                field: FieldName::AlpnProtocols
            }
        );
        assert_eq!(list[1].target(), Target::Server);
        assert_eq!(
            list[1].action(),
            &MutationAction::ModifyField {
                field: FieldName::Random,
                new_value: json!("deadbeef"),
            }
        );
    }

    #[test]
    fn test_identity_needs_no_fields() {
        let list = parse_json(json!([{"mutation": "identity", "target": "server"}])).unwrap();
        assert_eq!(list[0].kind(), MutationKind::Identity);
        assert!(list[0].fields().is_empty());
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let list = parse_json(json!([{
            "mutation": "remove_field",
            "target": "client",
            "fields": {"field_name": "key_share", "comment": "drop it"}
        }]))
        .unwrap();

        assert_eq!(list[0].fields().get("comment"), Some(&json!("drop it")));
    }

    #[test]
    fn test_payloads_are_opaque() {
        let list = parse_json(json!([
            {
                "mutation": "modify_field",
                "target": "client",
                "fields": {"field_name": "cipher_suites", "new_value": [4865, "not-a-suite", null]}
            },
            {
                "mutation": "send_additional_packet",
                "target": "server",
                "fields": {"packet_type": "ServerHello", "packet_content": {"anything": true}}
            }
        ]))
        .unwrap();

        assert_eq!(
            list[0].action(),
            &MutationAction::ModifyField {
                field: FieldName::CipherSuites,
                new_value: json!([4865, "not-a-suite", null]),
            }
        );
        assert_eq!(
            list[1].action(),
            &MutationAction::SendAdditionalPacket {
                packet_type: PacketType::ServerHello,
                packet_content: json!({"anything": true}),
            }
        );
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert!(matches!(
            parse("[{\"mutation\": "),
            Err(InvalidMutationSpec::Malformed(_))
        ));
        assert!(matches!(
            parse_json(json!({"mutation": "identity"})),
            Err(InvalidMutationSpec::NotAnArray)
        ));
        assert!(matches!(
            parse_json(json!(["identity"])),
            Err(InvalidMutationSpec::NotAnObject { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_unknown_mutation() {
        let err = parse_json(json!([{"mutation": "bogus", "target": "client", "fields": {}}]))
            .unwrap_err();
        match err {
            InvalidMutationSpec::UnknownMutation { index, value } => {
                assert_eq!(index, 0);
                assert_eq!(value, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_unknown_target() {
        let err = parse_json(json!([{"mutation": "identity", "target": "peer"}])).unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::UnknownTarget { index: 0, .. }));
    }

    #[test]
    fn test_rejects_missing_parameter() {
        let err = parse_json(json!([{"mutation": "remove_field", "target": "client", "fields": {}}]))
            .unwrap_err();
        assert!(matches!(
            err,
            InvalidMutationSpec::MissingParameter {
                index: 0,
                kind: MutationKind::RemoveField,
                param: Param::FieldName,
            }
        ));
        assert_eq!(
            err.to_string(),
            "Missing required field 'field_name' for mutation type 'remove_field' at #0"
        );

        let err = parse_json(json!([{
            "mutation": "send_additional_packet",
            "target": "client",
            "fields": {"packet_type": "ClientHello"}
        }]))
        .unwrap_err();
        assert!(matches!(
            err,
            InvalidMutationSpec::MissingParameter {
                param: Param::PacketContent,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_field_name() {
        let err = parse_json(json!([{
            "mutation": "remove_field",
            "target": "client",
            "fields": {"field_name": "not_a_real_field"}
        }]))
        .unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::InvalidFieldName { .. }));

        let err = parse_json(json!([{
            "mutation": "remove_field",
            "target": "client",
            "fields": {"field_name": 3}
        }]))
        .unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::InvalidFieldName { .. }));
    }

    #[test]
    fn test_rejects_bad_packet_type() {
        let err = parse_json(json!([{
            "mutation": "send_additional_packet",
            "target": "server",
            "fields": {"packet_type": "HelloRetry", "packet_content": ""}
        }]))
        .unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::InvalidPacketType { index: 0, .. }));
    }

    #[test]
    fn test_check_order_follows_declaration() {
        // kind before target
        let err = parse_json(json!([{"mutation": "bogus", "target": "peer"}])).unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::UnknownMutation { .. }));

        // field_name is checked before new_value
        let err = parse_json(json!([{
            "mutation": "modify_field",
            "target": "client",
            "fields": {"field_name": "nope"}
        }]))
        .unwrap_err();
        assert!(matches!(err, InvalidMutationSpec::InvalidFieldName { .. }));
    }

    #[test]
    fn test_first_failure_aborts_whole_list() {
        let err = parse_json(json!([
            {"mutation": "identity", "target": "client"},
            {"mutation": "identity", "target": "peer"},
            {"mutation": "bogus", "target": "client"}
        ]))
        .unwrap_err();
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn test_parse_reader() {
        let text = br#"[{"mutation": "identity", "target": "client"}]"#;
        let list = parse_reader(&text[..]).unwrap();
        assert_eq!(list.len(), 1);
    }
}

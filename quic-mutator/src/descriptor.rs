// quic-mutator/src/descriptor.rs
//! Validated mutation descriptors and the ordered list that carries them.

use crate::hello::FieldValue;
use crate::schema::{FieldName, MutationKind, PacketType, Target};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::ops::Deref;

/// The typed, already-validated payload of a descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAction {
    Identity,
    RemoveField {
        field: FieldName,
    },
    ModifyField {
        field: FieldName,
        new_value: FieldValue,
    },
    SendAdditionalPacket {
        packet_type: PacketType,
        packet_content: FieldValue,
    },
}

impl MutationAction {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationAction::Identity => MutationKind::Identity,
            MutationAction::RemoveField { .. } => MutationKind::RemoveField,
            MutationAction::ModifyField { .. } => MutationKind::ModifyField,
            MutationAction::SendAdditionalPacket { .. } => MutationKind::SendAdditionalPacket,
        }
    }
}

/// One validated instruction. Only the validator builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationDescriptor {
    action: MutationAction,
    target: Target,
    fields: Map<String, Value>,
}

impl MutationDescriptor {
    pub(crate) fn new(action: MutationAction, target: Target, fields: Map<String, Value>) -> Self {
        Self {
            action,
            target,
            fields,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.action.kind()
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn action(&self) -> &MutationAction {
        &self.action
    }

    /// The raw `fields` object as supplied, including keys the kind does not use
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether this descriptor applies to the hello sent by `role`
    pub fn targets(&self, role: Target) -> bool {
        self.target == role
    }
}

#[derive(serde::Serialize)]
struct WireDescriptor<'a> {
    mutation: MutationKind,
    target: Target,
    fields: &'a Map<String, Value>,
}

impl Serialize for MutationDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireDescriptor {
            mutation: self.kind(),
            target: self.target,
            fields: &self.fields,
        }
        .serialize(serializer)
    }
}

/// Ordered sequence of descriptors; order is the application order
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct MutationList(Vec<MutationDescriptor>);

impl MutationList {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Descriptors that apply to `role`, in list order
    pub fn for_target(&self, role: Target) -> impl Iterator<Item = &MutationDescriptor> {
        self.0.iter().filter(move |d| d.targets(role))
    }

    /// Encode back into the textual wire format
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn into_inner(self) -> Vec<MutationDescriptor> {
        self.0
    }
}

impl From<Vec<MutationDescriptor>> for MutationList {
    fn from(descriptors: Vec<MutationDescriptor>) -> Self {
        Self(descriptors)
    }
}

impl Deref for MutationList {
    type Target = [MutationDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MutationList {
    type Item = &'a MutationDescriptor;
    type IntoIter = std::slice::Iter<'a, MutationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MutationList {
    type Item = MutationDescriptor;
    type IntoIter = std::vec::IntoIter<MutationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_serializes_to_wire_shape() {
        let mut fields = Map::new();
        fields.insert("field_name".to_string(), json!("random"));
        fields.insert("new_value".to_string(), json!("deadbeef"));
        fields.insert("note".to_string(), json!(7));

        let descriptor = MutationDescriptor::new(
            MutationAction::ModifyField {
                field: FieldName::Random,
                new_value: json!("deadbeef"),
            },
            Target::Server,
            fields,
        );

        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "mutation": "modify_field",
                "target": "server",
                "fields": {"field_name": "random", "new_value": "deadbeef", "note": 7}
            })
        );
    }

    #[test]
    fn test_for_target_keeps_order() {
        let list = MutationList::from(vec![
            MutationDescriptor::new(MutationAction::Identity, Target::Client, Map::new()),
            MutationDescriptor::new(MutationAction::Identity, Target::Server, Map::new()),
            MutationDescriptor::new(
                MutationAction::RemoveField { field: FieldName::KeyShare },
                Target::Client,
                Map::new(),
            ),
        ]);

        let kinds: Vec<_> = list.for_target(Target::Client).map(|d| d.kind()).collect();
        assert_eq!(kinds, vec![MutationKind::Identity, MutationKind::RemoveField]);
        assert_eq!(list.for_target(Target::Server).count(), 1);
        assert!(MutationList::empty().is_empty());
    }
}

// quic-mutator-fuzzing/src/mutators/handshake.rs
//! Adapter from a validated mutation list to the `Mutator` trait

use crate::mutators::Mutator;
use quic_mutator::{apply_to_client, apply_to_server, ClientHello, InvalidMutationSpec, MutationList, ServerHello};

/// Applies one test case's mutation list to whichever hello it is given.
///
/// Additional-packet requests are dropped; use `quic_mutator::Engine` with a
/// sink to observe them.
#[derive(Debug, Clone)]
pub struct HandshakeMutator {
    mutations: MutationList,
}

impl HandshakeMutator {
    pub fn new(mutations: MutationList) -> Self {
        Self { mutations }
    }

    /// Validate `raw` and wrap the resulting list
    pub fn from_text(raw: &str) -> Result<Self, InvalidMutationSpec> {
        quic_mutator::parse(raw).map(Self::new)
    }

    pub fn mutations(&self) -> &MutationList {
        &self.mutations
    }
}

impl Mutator<ClientHello> for HandshakeMutator {
    fn mutate(&self, input: &mut ClientHello) {
        apply_to_client(input, &self.mutations);
    }
}

impl Mutator<ServerHello> for HandshakeMutator {
    fn mutate(&self, input: &mut ServerHello) {
        apply_to_server(input, &self.mutations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_MUTATION_LIST;
    use serde_json::json;

    #[test]
    fn test_sample_list_through_mutator() {
        let mutator = HandshakeMutator::from_text(SAMPLE_MUTATION_LIST).unwrap();
        assert_eq!(mutator.mutations().len(), 2);

        let mut client = ClientHello {
            alpn_protocols: Some(json!(["h3"])),
            random: Some(json!("00")),
            ..Default::default()
        };
        mutator.mutate(&mut client);
        assert_eq!(client.alpn_protocols, None);
        assert_eq!(client.random, Some(json!("00")));

        let mut server = ServerHello::default();
        mutator.mutate(&mut server);
        assert_eq!(server.random, Some(json!("deadbeef")));
    }

    #[test]
    fn test_repeated_application_matches_single() {
        let mutator = HandshakeMutator::from_text(
            r#"[
                {"mutation": "modify_field", "target": "client", "fields": {"field_name": "early_data", "new_value": true}},
                {"mutation": "remove_field", "target": "client", "fields": {"field_name": "early_data"}},
                {"mutation": "modify_field", "target": "client", "fields": {"field_name": "server_name", "new_value": "x"}}
            ]"#,
        )
        .unwrap();

        let mut once = ClientHello::default();
        mutator.mutate(&mut once);
        let mut thrice = ClientHello::default();
        mutator.mutate_multiple(&mut thrice, 3);
        assert_eq!(once, thrice);
        assert_eq!(once.early_data, None);
    }
}

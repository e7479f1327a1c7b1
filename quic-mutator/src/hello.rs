// quic-mutator/src/hello.rs
//! Field access for ClientHello / ServerHello messages.
//!
//! The handshake library owns the real message types; the engine only needs
//! to know which named fields a shape exposes and how to read or replace them.
//! [`ClientHello`] and [`ServerHello`] are reference shapes used by the
//! fuzzing harness and tests.

use crate::schema::{FieldName, Target};
use serde::{Deserialize, Serialize};

/// Opaque field payload. No type checking against the real field type is done.
pub type FieldValue = serde_json::Value;

/// Capability interface over a hello message's named fields.
///
/// A field is *exposed* when the concrete shape has a slot for it, whether
/// or not the slot is currently populated.
pub trait HelloFields {
    /// Which side sends this message
    const ROLE: Target;

    fn slot(&self, name: FieldName) -> Option<&Option<FieldValue>>;

    fn slot_mut(&mut self, name: FieldName) -> Option<&mut Option<FieldValue>>;

    fn has(&self, name: FieldName) -> bool {
        self.slot(name).is_some()
    }

    fn get(&self, name: FieldName) -> Option<&FieldValue> {
        self.slot(name).and_then(Option::as_ref)
    }

    /// Replace the field; returns false when the shape does not expose it.
    fn set(&mut self, name: FieldName, value: Option<FieldValue>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Every vocabulary field this shape exposes
    fn exposed_fields(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|name| self.has(*name))
            .collect()
    }
}

/// ClientHello with every mutable field of the vocabulary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientHello {
    pub random: Option<FieldValue>,
    pub legacy_session_id: Option<FieldValue>,
    pub cipher_suites: Option<FieldValue>,
    pub legacy_compression_methods: Option<FieldValue>,
    pub alpn_protocols: Option<FieldValue>,
    pub early_data: Option<FieldValue>,
    pub key_share: Option<FieldValue>,
    pub pre_shared_key: Option<FieldValue>,
    pub psk_key_exchange_modes: Option<FieldValue>,
    pub server_name: Option<FieldValue>,
    pub signature_algorithms: Option<FieldValue>,
    pub supported_groups: Option<FieldValue>,
    pub supported_versions: Option<FieldValue>,
    pub other_extensions: Option<FieldValue>,
}

/// ServerHello. `cipher_suite`, `compression_method` and `supported_version`
/// are singular here and have no vocabulary name, so they are never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerHello {
    pub random: Option<FieldValue>,
    pub legacy_session_id: Option<FieldValue>,
    pub cipher_suite: Option<FieldValue>,
    pub compression_method: Option<FieldValue>,
    pub key_share: Option<FieldValue>,
    pub pre_shared_key: Option<FieldValue>,
    pub supported_version: Option<FieldValue>,
    pub other_extensions: Option<FieldValue>,
}

macro_rules! hello_fields {
    ($ty:ty, $role:expr, { $($name:ident => $field:ident),* $(,)? }) => {
        impl HelloFields for $ty {
            const ROLE: Target = $role;

            #[allow(unreachable_patterns)]
            fn slot(&self, name: FieldName) -> Option<&Option<FieldValue>> {
                match name {
                    $(FieldName::$name => Some(&self.$field),)*
                    _ => None,
                }
            }

            #[allow(unreachable_patterns)]
            fn slot_mut(&mut self, name: FieldName) -> Option<&mut Option<FieldValue>> {
                match name {
                    $(FieldName::$name => Some(&mut self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

hello_fields!(ClientHello, Target::Client, {
    Random => random,
    LegacySessionId => legacy_session_id,
    CipherSuites => cipher_suites,
    LegacyCompressionMethods => legacy_compression_methods,
    AlpnProtocols => alpn_protocols,
    EarlyData => early_data,
    KeyShare => key_share,
    PreSharedKey => pre_shared_key,
    PskKeyExchangeModes => psk_key_exchange_modes,
    ServerName => server_name,
    SignatureAlgorithms => signature_algorithms,
    SupportedGroups => supported_groups,
    SupportedVersions => supported_versions,
    OtherExtensions => other_extensions,
});

hello_fields!(ServerHello, Target::Server, {
    Random => random,
    LegacySessionId => legacy_session_id,
    KeyShare => key_share,
    PreSharedKey => pre_shared_key,
    OtherExtensions => other_extensions,
});

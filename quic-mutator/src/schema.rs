// quic-mutator/src/schema.rs
//! Closed vocabulary of the mutation description language.
//!
//! Every name accepted on the wire is an enum variant here. The mapping from a
//! mutation kind to its required parameters lives in
//! [`MutationKind::required_params`] and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of mutation a descriptor can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Leave the message untouched
    Identity,
    /// Clear a named field
    RemoveField,
    /// Overwrite a named field with a caller-supplied value
    ModifyField,
    /// Ask the transport to emit an extra handshake packet
    SendAdditionalPacket,
}

impl MutationKind {
    pub const ALL: [MutationKind; 4] = [
        MutationKind::Identity,
        MutationKind::RemoveField,
        MutationKind::ModifyField,
        MutationKind::SendAdditionalPacket,
    ];

    /// Parameters that must be present in `fields`, in validation order.
    pub fn required_params(&self) -> &'static [Param] {
        match self {
            MutationKind::Identity => &[],
            MutationKind::RemoveField => &[Param::FieldName],
            MutationKind::ModifyField => &[Param::FieldName, Param::NewValue],
            MutationKind::SendAdditionalPacket => &[Param::PacketType, Param::PacketContent],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Identity => "identity",
            MutationKind::RemoveField => "remove_field",
            MutationKind::ModifyField => "modify_field",
            MutationKind::SendAdditionalPacket => "send_additional_packet",
        }
    }
}

/// Parameter keys understood inside a descriptor's `fields` object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    FieldName,
    NewValue,
    PacketType,
    PacketContent,
}

impl Param {
    pub fn as_str(&self) -> &'static str {
        match self {
            Param::FieldName => "field_name",
            Param::NewValue => "new_value",
            Param::PacketType => "packet_type",
            Param::PacketContent => "packet_content",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side's hello a descriptor applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Client,
    Server,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Client, Target::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Client => "client",
            Target::Server => "server",
        }
    }
}

/// Mutable handshake fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Random,
    LegacySessionId,
    CipherSuites,
    LegacyCompressionMethods,
    AlpnProtocols,
    EarlyData,
    KeyShare,
    PreSharedKey,
    PskKeyExchangeModes,
    ServerName,
    SignatureAlgorithms,
    SupportedGroups,
    SupportedVersions,
    OtherExtensions,
}

impl FieldName {
    pub const ALL: [FieldName; 14] = [
        FieldName::Random,
        FieldName::LegacySessionId,
        FieldName::CipherSuites,
        FieldName::LegacyCompressionMethods,
        FieldName::AlpnProtocols,
        FieldName::EarlyData,
        FieldName::KeyShare,
        FieldName::PreSharedKey,
        FieldName::PskKeyExchangeModes,
        FieldName::ServerName,
        FieldName::SignatureAlgorithms,
        FieldName::SupportedGroups,
        FieldName::SupportedVersions,
        FieldName::OtherExtensions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Random => "random",
            FieldName::LegacySessionId => "legacy_session_id",
            FieldName::CipherSuites => "cipher_suites",
            FieldName::LegacyCompressionMethods => "legacy_compression_methods",
            FieldName::AlpnProtocols => "alpn_protocols",
            FieldName::EarlyData => "early_data",
            FieldName::KeyShare => "key_share",
            FieldName::PreSharedKey => "pre_shared_key",
            FieldName::PskKeyExchangeModes => "psk_key_exchange_modes",
            FieldName::ServerName => "server_name",
            FieldName::SignatureAlgorithms => "signature_algorithms",
            FieldName::SupportedGroups => "supported_groups",
            FieldName::SupportedVersions => "supported_versions",
            FieldName::OtherExtensions => "other_extensions",
        }
    }
}

/// Packet types `send_additional_packet` may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    ClientHello,
    ServerHello,
}

impl PacketType {
    pub const ALL: [PacketType; 2] = [PacketType::ClientHello, PacketType::ServerHello];

    pub fn as_str(&self) -> &'static str {
        match self {
            PacketType::ClientHello => "ClientHello",
            PacketType::ServerHello => "ServerHello",
        }
    }
}

/// Error returned when a wire name is not part of the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name '{}'", self.0)
    }
}

impl std::error::Error for UnknownName {}

macro_rules! wire_names {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = UnknownName;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::ALL
                        .into_iter()
                        .find(|v| v.as_str() == s)
                        .ok_or_else(|| UnknownName(s.to_string()))
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

wire_names!(MutationKind, Target, FieldName, PacketType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for kind in MutationKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
            assert_eq!(kind.as_str().parse::<MutationKind>().unwrap(), kind);
        }
        for field in FieldName::ALL {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, field.as_str());
            assert_eq!(field.as_str().parse::<FieldName>().unwrap(), field);
        }
        for packet in PacketType::ALL {
            let json = serde_json::to_value(packet).unwrap();
            assert_eq!(json, packet.as_str());
        }
        assert_eq!(serde_json::to_value(Target::Server).unwrap(), "server");
    }

    #[test]
    fn test_required_params() {
        assert!(MutationKind::Identity.required_params().is_empty());
        assert_eq!(MutationKind::RemoveField.required_params(), &[Param::FieldName]);
        assert_eq!(
            MutationKind::ModifyField.required_params(),
            &[Param::FieldName, Param::NewValue]
        );
        assert_eq!(
            MutationKind::SendAdditionalPacket.required_params(),
            &[Param::PacketType, Param::PacketContent]
        );
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert_eq!("bogus".parse::<MutationKind>(), Err(UnknownName("bogus".to_string())));
        assert!("peer".parse::<Target>().is_err());
        assert!("HelloRetry".parse::<PacketType>().is_err());
        assert!("Random".parse::<FieldName>().is_err());
    }
}

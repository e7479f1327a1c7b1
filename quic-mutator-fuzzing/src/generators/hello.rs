// quic-mutator-fuzzing/src/generators/hello.rs
//! Generators for reference ClientHello / ServerHello messages

use crate::constants::DEFAULT_POPULATE_RATIO;
use crate::generators::{hex_bytes, Generator};
use quic_mutator::{ClientHello, FieldName, FieldValue, HelloFields, ServerHello, Target};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

const TLS_AES_128_GCM_SHA256: u16 = 0x1301;
const TLS_AES_256_GCM_SHA384: u16 = 0x1302;
const TLS_CHACHA20_POLY1305_SHA256: u16 = 0x1303;
const TLS_VERSION_1_3: u16 = 0x0304;
const GROUP_X25519: u16 = 0x001d;
const GROUP_SECP256R1: u16 = 0x0017;
const QUIC_TRANSPORT_PARAMETERS: u16 = 0x0039;

/// Generator for ClientHello messages with a random subset of fields populated
pub struct ClientHelloGenerator {
    populate_ratio: f64,
}

impl ClientHelloGenerator {
    pub fn new() -> Self {
        Self::with_populate_ratio(DEFAULT_POPULATE_RATIO)
    }

    pub fn with_populate_ratio(populate_ratio: f64) -> Self {
        Self {
            populate_ratio: populate_ratio.clamp(0.0, 1.0),
        }
    }
}

impl Default for ClientHelloGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<ClientHello> for ClientHelloGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ClientHello {
        let mut hello = ClientHello::default();
        populate(&mut hello, self.populate_ratio, rng);
        hello
    }
}

/// Generator for ServerHello messages. The non-mutable singular fields are always set.
pub struct ServerHelloGenerator {
    populate_ratio: f64,
}

impl ServerHelloGenerator {
    pub fn new() -> Self {
        Self::with_populate_ratio(DEFAULT_POPULATE_RATIO)
    }

    pub fn with_populate_ratio(populate_ratio: f64) -> Self {
        Self {
            populate_ratio: populate_ratio.clamp(0.0, 1.0),
        }
    }
}

impl Default for ServerHelloGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<ServerHello> for ServerHelloGenerator {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ServerHello {
        let suites = [
            TLS_AES_128_GCM_SHA256,
            TLS_AES_256_GCM_SHA384,
            TLS_CHACHA20_POLY1305_SHA256,
        ];
        let mut hello = ServerHello {
            cipher_suite: suites.choose(rng).map(|suite| json!(suite)),
            compression_method: Some(json!(0)),
            supported_version: Some(json!(TLS_VERSION_1_3)),
            ..Default::default()
        };
        populate(&mut hello, self.populate_ratio, rng);
        hello
    }
}

fn populate<M: HelloFields, R: Rng + ?Sized>(hello: &mut M, ratio: f64, rng: &mut R) {
    for name in hello.exposed_fields() {
        if rng.gen_bool(ratio) {
            let value = sample_value(name, M::ROLE, rng);
            hello.set(name, Some(value));
        }
    }
}

/// A plausible value for `field` as sent by `role`
pub fn sample_value<R: Rng + ?Sized>(field: FieldName, role: Target, rng: &mut R) -> FieldValue {
    match field {
        FieldName::Random => json!(hex_bytes(rng, 32)),
        FieldName::LegacySessionId => {
            let len = *[0usize, 32].choose(rng).unwrap_or(&32);
            json!(hex_bytes(rng, len))
        }
        FieldName::CipherSuites => {
            let mut suites = vec![
                TLS_AES_128_GCM_SHA256,
                TLS_AES_256_GCM_SHA384,
                TLS_CHACHA20_POLY1305_SHA256,
            ];
            suites.shuffle(rng);
            suites.truncate(rng.gen_range(1..=3));
            json!(suites)
        }
        FieldName::LegacyCompressionMethods => json!([0]),
        FieldName::AlpnProtocols => {
            let mut protocols = vec!["h3", "h3-29", "hq-interop"];
            protocols.shuffle(rng);
            protocols.truncate(rng.gen_range(1..=3));
            json!(protocols)
        }
        FieldName::EarlyData => json!(rng.gen_bool(0.5)),
        FieldName::KeyShare => match role {
            Target::Client => json!([[GROUP_X25519, hex_bytes(rng, 32)], [GROUP_SECP256R1, hex_bytes(rng, 65)]]),
            Target::Server => json!([GROUP_X25519, hex_bytes(rng, 32)]),
        },
        FieldName::PreSharedKey => match role {
            Target::Client => json!({
                "identities": [[hex_bytes(rng, 16), rng.gen::<u32>()]],
                "binders": [hex_bytes(rng, 32)],
            }),
            Target::Server => json!(0),
        },
        FieldName::PskKeyExchangeModes => json!([1]),
        FieldName::ServerName => json!(*["localhost", "example.com", "quic.test"]
            .choose(rng)
            .unwrap_or(&"localhost")),
        FieldName::SignatureAlgorithms => json!([0x0403, 0x0804, 0x0401]),
        FieldName::SupportedGroups => json!([GROUP_X25519, GROUP_SECP256R1]),
        FieldName::SupportedVersions => json!([TLS_VERSION_1_3]),
        FieldName::OtherExtensions => json!([[QUIC_TRANSPORT_PARAMETERS, hex_bytes(rng, 24)]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_ratio_populates_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let client = ClientHelloGenerator::with_populate_ratio(1.0).generate(&mut rng);
        for name in FieldName::ALL {
            assert!(client.get(name).is_some(), "{name} missing");
        }

        let server = ServerHelloGenerator::with_populate_ratio(1.0).generate(&mut rng);
        for name in server.exposed_fields() {
            assert!(server.get(name).is_some(), "{name} missing");
        }
        assert_eq!(server.supported_version, Some(json!(TLS_VERSION_1_3)));
        assert!(server.cipher_suite.is_some());
    }

    #[test]
    fn test_zero_ratio_leaves_fields_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        let client = ClientHelloGenerator::with_populate_ratio(0.0).generate(&mut rng);
        assert_eq!(client, ClientHello::default());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generator = ClientHelloGenerator::new();
        let a = generator.generate_set(&mut StdRng::seed_from_u64(42), 4);
        let b = generator.generate_set(&mut StdRng::seed_from_u64(42), 4);
        assert_eq!(a, b);
    }
}

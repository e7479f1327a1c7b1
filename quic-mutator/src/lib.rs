// QUIC handshake mutation core
//
// Validates declarative mutation lists and applies them to ClientHello /
// ServerHello messages produced by an external handshake library.

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod hello;
pub mod schema;
pub mod sink;
pub mod validator;

// Re-exports for convenience
pub use descriptor::{MutationAction, MutationDescriptor, MutationList};
pub use engine::{apply_to_client, apply_to_server, Engine};
pub use error::InvalidMutationSpec;
pub use hello::{ClientHello, FieldValue, HelloFields, ServerHello};
pub use schema::{FieldName, MutationKind, PacketType, Param, Target};
pub use sink::{AdditionalPacket, DropSink, PacketSink};
pub use validator::{parse, parse_reader, parse_value};

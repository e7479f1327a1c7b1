use crate::schema::{MutationKind, Param};
use thiserror::Error;

/// Reasons a mutation list is rejected by the validator.
///
/// The first violation found aborts the whole parse; `index` is the position
/// of the offending entry in the input array.
#[derive(Error, Debug)]
pub enum InvalidMutationSpec {
    /// The text is not well-formed JSON
    #[error("Malformed mutation list: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The top-level value is not an array
    #[error("Mutation list must be a JSON array")]
    NotAnArray,

    /// An entry (or its `fields`) is not a JSON object
    #[error("Mutation #{index} must be a JSON object")]
    NotAnObject { index: usize },

    #[error("Invalid mutation type at #{index}: {value}")]
    UnknownMutation { index: usize, value: String },

    #[error("Invalid target at #{index}: {value}")]
    UnknownTarget { index: usize, value: String },

    #[error("Missing required field '{param}' for mutation type '{kind}' at #{index}")]
    MissingParameter {
        index: usize,
        kind: MutationKind,
        param: Param,
    },

    #[error("Invalid field name at #{index}: {value}")]
    InvalidFieldName { index: usize, value: String },

    #[error("Invalid packet type at #{index}: {value}")]
    InvalidPacketType { index: usize, value: String },
}

impl InvalidMutationSpec {
    /// Index of the rejected entry, when the failure is tied to one
    pub fn index(&self) -> Option<usize> {
        match self {
            InvalidMutationSpec::Malformed(_) | InvalidMutationSpec::NotAnArray => None,
            InvalidMutationSpec::NotAnObject { index }
            | InvalidMutationSpec::UnknownMutation { index, .. }
            | InvalidMutationSpec::UnknownTarget { index, .. }
            | InvalidMutationSpec::MissingParameter { index, .. }
            | InvalidMutationSpec::InvalidFieldName { index, .. }
            | InvalidMutationSpec::InvalidPacketType { index, .. } => Some(*index),
        }
    }
}

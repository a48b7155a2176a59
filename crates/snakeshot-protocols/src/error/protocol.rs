//! Wire-level protocol errors (push messages and identity responses).

use thiserror::Error;

use super::GridError;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Unexpected event: expected {expected}, got {actual}")]
    UnexpectedEvent { expected: String, actual: String },

    #[error("Invalid map: {0}")]
    Map(#[from] GridError),
}

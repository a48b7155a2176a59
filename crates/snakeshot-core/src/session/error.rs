//! Session error type.

use std::path::PathBuf;
use std::time::Duration;

use snakeshot_protocols::{ProtocolError, UiError};
use thiserror::Error;

use super::state::SessionState;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An awaited response, push message or capture did not arrive in time.
    #[error("Timed out after {after:?} waiting for {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Malformed or unexpected data from the server.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The UI collaborator failed.
    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    /// Filesystem error while persisting session output.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A phase was entered without what it needs.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Phase called out of order.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

impl SessionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout { .. })
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = SessionError::Timeout {
            operation: "push message",
            after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "Timed out after 60s waiting for push message");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_io_display_includes_path() {
        let err = SessionError::io(
            "/tmp/frames/0.png",
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        );
        assert!(err.to_string().contains("/tmp/frames/0.png"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = SessionError::InvalidTransition {
            from: SessionState::Idle,
            to: SessionState::Playing,
        };
        assert_eq!(err.to_string(), "Invalid state transition from idle to playing");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: SessionError = ProtocolError::MissingField("id".to_string()).into();
        assert!(matches!(err, SessionError::Protocol(_)));
    }
}

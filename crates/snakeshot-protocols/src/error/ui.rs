//! Game UI collaborator errors.

use thiserror::Error;

use super::ProtocolError;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("UI action failed: {0}")]
    ActionFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("UI operation timed out: {0}")]
    Timeout(String),

    #[error("Push channel closed")]
    ChannelClosed,

    #[error("Browser not connected")]
    NotConnected,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_error_display() {
        let err = UiError::ElementNotFound(".match-btn".to_string());
        assert_eq!(err.to_string(), "Element not found: .match-btn");

        let err = UiError::ChannelClosed;
        assert_eq!(err.to_string(), "Push channel closed");
    }

    #[test]
    fn test_protocol_error_from() {
        let err = UiError::from(ProtocolError::MissingField("id".to_string()));
        assert!(err.to_string().contains("Missing field: id"));
    }
}

//! Game UI collaborator contracts.
//!
//! The session controller never touches a browser directly. It talks to a
//! [`GameUi`] for page actions and a [`PushChannel`] for server pushes, so
//! both can be swapped for scripted fakes in tests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::direction::Direction;
use crate::error::{ProtocolError, UiError};
use crate::push::PushMessage;

/// Opaque player identifier as issued by the game server.
///
/// The server sends ids as numbers in some places and strings in others, so
/// ids are kept in their decimal/text form and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accept a JSON string or number.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the match a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PlayerA,
    PlayerB,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::PlayerA => write!(f, "player_a"),
            Role::PlayerB => write!(f, "player_b"),
        }
    }
}

/// Login credentials for one player.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of the identity query the page issues after login.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityResponse {
    pub body: Value,
}

impl IdentityResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The `id` field of the body.
    pub fn player_id(&self) -> Result<PlayerId, ProtocolError> {
        let id = self
            .body
            .get("id")
            .ok_or_else(|| ProtocolError::MissingField("id".to_string()))?;
        PlayerId::from_json(id).ok_or_else(|| ProtocolError::InvalidField {
            field: "id".to_string(),
            message: format!("expected string or number, got {}", id),
        })
    }
}

/// Page-side actions against the game UI.
///
/// Every call may block on the page; callers bound them with timeouts.
#[async_trait]
pub trait GameUi: Send + Sync {
    /// Log in and return the identity response the page receives.
    async fn submit_credentials(&self, credentials: &Credentials)
    -> Result<IdentityResponse, UiError>;

    /// Ask the server to pair this player.
    async fn request_match(&self) -> Result<(), UiError>;

    /// Capture the game surface as PNG bytes.
    async fn capture_frame(&self) -> Result<Vec<u8>, UiError>;

    /// Send the input for one move.
    async fn dispatch_input(&self, direction: Direction) -> Result<(), UiError>;
}

/// Inbound server push messages.
///
/// Each call resolves with exactly one message. Dropping the returned future
/// (for example on timeout) cancels the wait without losing later messages.
#[async_trait]
pub trait PushChannel: Send {
    async fn next_message(&mut self) -> Result<PushMessage, UiError>;

    /// Drop messages that arrived before this call and return how many.
    ///
    /// Called right before a match is requested, so anything the server
    /// pushed during login cannot be taken for the pairing message.
    fn discard_pending(&mut self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_id_from_json() {
        assert_eq!(PlayerId::from_json(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(PlayerId::from_json(&json!("abc")).unwrap().as_str(), "abc");
        assert!(PlayerId::from_json(&json!("")).is_none());
        assert!(PlayerId::from_json(&json!(null)).is_none());
        assert!(PlayerId::from_json(&json!([1])).is_none());
    }

    #[test]
    fn test_number_and_string_ids_compare_equal() {
        assert_eq!(
            PlayerId::from_json(&json!(7)),
            PlayerId::from_json(&json!("7"))
        );
    }

    #[test]
    fn test_identity_response_player_id() {
        let resp = IdentityResponse::new(json!({"id": 12, "username": "terry"}));
        assert_eq!(resp.player_id().unwrap(), PlayerId::new("12"));
    }

    #[test]
    fn test_identity_response_missing_id() {
        let resp = IdentityResponse::new(json!({"username": "terry"}));
        assert!(matches!(
            resp.player_id(),
            Err(ProtocolError::MissingField(f)) if f == "id"
        ));
    }

    #[test]
    fn test_identity_response_invalid_id() {
        let resp = IdentityResponse::new(json!({"id": true}));
        assert!(matches!(
            resp.player_id(),
            Err(ProtocolError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("terry", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("terry"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::PlayerA.to_string(), "player_a");
        assert_eq!(Role::PlayerB.to_string(), "player_b");
    }
}

//! Server push messages.
//!
//! Messages arrive as JSON objects tagged by an `event` field; everything
//! else is event-specific payload:
//!
//! ```text
//! { "event": "start-matching", "game": { "map": [[1,1,..],..], "a_id": 3, "b_id": 7 } }
//! { "event": "result", "loser": "A" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::grid::{Bounds, GridMap};
use crate::ui::PlayerId;

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;

pub const EVENT_START_MATCHING: &str = "start-matching";
pub const EVENT_RESULT: &str = "result";

/// Recognised push event kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Pairing completed; payload carries the board and both player ids.
    StartMatching,
    /// The game is over.
    Result,
    /// Any other event (per-step moves, chat, ...).
    Other(String),
}

/// A single inbound push message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub event: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Payload of a `start-matching` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStart {
    pub map: GridMap,
    pub a_id: PlayerId,
    pub b_id: PlayerId,
}

impl PushMessage {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            payload: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Parse a raw frame payload.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> PushEvent {
        match self.event.as_str() {
            EVENT_START_MATCHING => PushEvent::StartMatching,
            EVENT_RESULT => PushEvent::Result,
            other => PushEvent::Other(other.to_string()),
        }
    }

    pub fn is_result(&self) -> bool {
        self.kind() == PushEvent::Result
    }

    /// Extract the match payload, using `bounds` as the board's usable area.
    ///
    /// Fails if this is not a `start-matching` message or the payload is
    /// malformed.
    pub fn match_start(&self, bounds: Bounds) -> Result<MatchStart, ProtocolError> {
        if self.kind() != PushEvent::StartMatching {
            return Err(ProtocolError::UnexpectedEvent {
                expected: EVENT_START_MATCHING.to_string(),
                actual: self.event.clone(),
            });
        }

        let game = self
            .payload
            .get("game")
            .and_then(Value::as_object)
            .ok_or_else(|| ProtocolError::MissingField("game".to_string()))?;

        let raw_map = game
            .get("map")
            .ok_or_else(|| ProtocolError::MissingField("game.map".to_string()))?;
        let codes: Vec<Vec<i64>> =
            serde_json::from_value(raw_map.clone()).map_err(|e| ProtocolError::InvalidField {
                field: "game.map".to_string(),
                message: e.to_string(),
            })?;
        let map = GridMap::from_codes(&codes, bounds)?;

        let a_id = player_field(game, "a_id")?;
        let b_id = player_field(game, "b_id")?;

        Ok(MatchStart { map, a_id, b_id })
    }
}

fn player_field(game: &Map<String, Value>, key: &str) -> Result<PlayerId, ProtocolError> {
    let field = format!("game.{}", key);
    let value = game
        .get(key)
        .ok_or_else(|| ProtocolError::MissingField(field.clone()))?;
    PlayerId::from_json(value).ok_or_else(|| ProtocolError::InvalidField {
        field,
        message: format!("expected string or number, got {}", value),
    })
}

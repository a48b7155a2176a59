//! Session lifecycle states.

use serde::{Deserialize, Serialize};

/// Session controller state.
///
/// ```text
/// Idle -> Authenticating -> Matchmaking -> Planning -> Playing -> Finished
///              \________________\______________\__________\____-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created, nothing done yet.
    Idle,
    /// Waiting for the identity response.
    Authenticating,
    /// Waiting for the server to pair us.
    Matchmaking,
    /// Map received, choosing moves.
    Planning,
    /// Executing moves and capturing frames.
    Playing,
    /// Play ended normally.
    Finished,
    /// A phase failed; terminal.
    Failed,
}

impl SessionState {
    /// Whether `self -> next` is a legal edge.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Idle, Authenticating)
            | (Authenticating, Matchmaking)
            | (Matchmaking, Planning)
            | (Planning, Playing)
            | (Playing, Finished) => true,
            (Authenticating | Matchmaking | Planning | Playing, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Failed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Authenticating => write!(f, "authenticating"),
            SessionState::Matchmaking => write!(f, "matchmaking"),
            SessionState::Planning => write!(f, "planning"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Finished => write!(f, "finished"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

//! Session controller and its supporting types.

mod config;
mod controller;
mod error;
mod frames;
mod state;


pub use config::SessionConfig;
pub use controller::{EndReason, GameSession, SessionController, SessionOutcome, SessionRecord};
pub use error::{SessionError, SessionResult};
pub use frames::{FrameStore, SESSION_METADATA_FILE};
pub use state::SessionState;

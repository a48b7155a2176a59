//! # Snakeshot Core
//!
//! Move planning and the per-player session controller.
//!
//! - [`PathPlanner`]: bounded longest-walk search over the game board
//! - [`SessionController`]: authenticate, matchmake, plan and play one match
//!   while recording a frame per step

pub mod planner;
pub mod session;

pub use planner::PathPlanner;
pub use session::{
    EndReason, FrameStore, GameSession, SESSION_METADATA_FILE, SessionConfig, SessionController,
    SessionError, SessionOutcome, SessionRecord, SessionResult, SessionState,
};

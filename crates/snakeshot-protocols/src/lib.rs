//! # Snakeshot Protocols
//!
//! Shared model and collaborator contracts for the snakeshot recorder.
//! Contains only data types and interface definitions - no I/O.
//!
//! ## Model
//!
//! - [`GridMap`] - the board received from the game server
//! - [`Direction`] / [`MoveSequence`] - planned moves under the no-reversal rule
//! - [`PushMessage`] - server-initiated notifications
//!
//! ## Collaborator Traits
//!
//! - [`GameUi`] - browser-side actions (login, matchmaking, capture, input)
//! - [`PushChannel`] - inbound push message stream

pub mod direction;
pub mod error;
pub mod grid;
pub mod moves;
pub mod push;
pub mod ui;

pub use direction::Direction;
pub use error::{GridError, MoveError, ProtocolError, UiError};
pub use grid::{Bounds, Cell, GridMap, Position, StartCandidate};
pub use moves::{MAX_MOVES, MoveSequence};
pub use push::{MatchStart, PushEvent, PushMessage};
pub use ui::{Credentials, GameUi, IdentityResponse, PlayerId, PushChannel, Role};

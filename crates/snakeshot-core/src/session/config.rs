//! Runtime settings for one session.

use std::path::PathBuf;
use std::time::Duration;

use snakeshot_protocols::{Bounds, Direction, MAX_MOVES, Role, StartCandidate};

/// Session controller configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Usable area of the board.
    pub bounds: Bounds,

    /// Seed candidates when playing as player A.
    pub player_a_candidates: [StartCandidate; 2],

    /// Seed candidates when playing as player B.
    pub player_b_candidates: [StartCandidate; 2],

    /// Planner length cap.
    pub max_moves: usize,

    /// Bound on the identity response after login.
    pub response_timeout: Duration,

    /// Bound on each push message wait.
    pub push_timeout: Duration,

    /// Bound on each frame capture.
    pub capture_timeout: Duration,

    /// Pause before each step so the page can render.
    pub step_settle: Duration,

    /// Directory under which per-match frame directories are created.
    pub frames_root: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds {
                min_row: 1,
                max_row: 12,
                min_col: 1,
                max_col: 13,
            },
            player_a_candidates: [
                StartCandidate::new(10, 1, Direction::Up),
                StartCandidate::new(11, 2, Direction::Right),
            ],
            player_b_candidates: [
                StartCandidate::new(2, 12, Direction::Down),
                StartCandidate::new(1, 11, Direction::Left),
            ],
            max_moves: MAX_MOVES,
            response_timeout: Duration::from_secs(30),
            push_timeout: Duration::from_secs(60),
            capture_timeout: Duration::from_secs(10),
            step_settle: Duration::from_millis(1000),
            frames_root: PathBuf::from("temp"),
        }
    }
}

impl SessionConfig {
    /// Candidate pair for `role`.
    pub fn candidates(&self, role: Role) -> &[StartCandidate; 2] {
        match role {
            Role::PlayerA => &self.player_a_candidates,
            Role::PlayerB => &self.player_b_candidates,
        }
    }
}

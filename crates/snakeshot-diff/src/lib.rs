//! # Snakeshot Diff
//!
//! Offline comparison of two recorded sessions.
//!
//! Given two directories of per-step frames (`0.png..N-1.png`), the
//! [`VisualDiffEngine`] produces:
//!
//! - a cross-session diff image and percentage per step
//! - an intra-session diff image and percentage per pair of adjacent steps
//! - `diff-log.json` holding all percentages ([`DiffReport`])
//! - an HTML report linking everything together

pub mod engine;
pub mod error;
pub mod format;
pub mod html;
pub mod pixel;
pub mod report;

pub use engine::{Comparison, DIFF_LOG_FILE, DiffLayout, EACH_STEP_DIR, VisualDiffEngine, count_frames};
pub use error::{DiffError, DiffResult};
pub use format::{percentage, to_precision3};
pub use pixel::{DiffOptions, PixelDiff, SizeMismatch};
pub use report::{DiffReport, EachPlayer};

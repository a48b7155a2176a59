//! Run-time settings: timing, output layout and diff options.

use serde::{Deserialize, Serialize};

/// Timeouts and settle delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Bound on page responses (identity query, match request, input).
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,

    /// Bound on each server push wait.
    #[serde(default = "default_push_timeout")]
    pub push_timeout_secs: u64,

    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: u64,

    /// Pause before each step.
    #[serde(default = "default_settle_ms")]
    pub step_settle_ms: u64,

    /// Pause for the login drawer to close before clicking match.
    #[serde(default = "default_settle_ms")]
    pub drawer_settle_ms: u64,

    /// Time the browser stays open after a session ends.
    #[serde(default = "default_teardown_grace")]
    pub teardown_grace_ms: u64,
}

fn default_response_timeout() -> u64 {
    30
}

fn default_push_timeout() -> u64 {
    60
}

fn default_capture_timeout() -> u64 {
    10
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_teardown_grace() -> u64 {
    8000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: default_response_timeout(),
            push_timeout_secs: default_push_timeout(),
            capture_timeout_secs: default_capture_timeout(),
            step_settle_ms: default_settle_ms(),
            drawer_settle_ms: default_settle_ms(),
            teardown_grace_ms: default_teardown_grace(),
        }
    }
}

/// Where recordings and reports go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root of per-session frame directories.
    #[serde(default = "default_frames_dir")]
    pub frames_dir: String,

    /// Name of the diff output directory inside `frames_dir`.
    #[serde(default = "default_diff_dir_name")]
    pub diff_dir_name: String,

    /// Directory receiving `report.html`.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

fn default_frames_dir() -> String {
    "temp".to_string()
}

fn default_diff_dir_name() -> String {
    "diff".to_string()
}

fn default_report_dir() -> String {
    "result".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frames_dir: default_frames_dir(),
            diff_dir_name: default_diff_dir_name(),
            report_dir: default_report_dir(),
        }
    }
}

/// Pixel comparator options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Matching threshold in `0..=1`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Count anti-aliased pixels as differences.
    #[serde(default)]
    pub include_aa: bool,

    /// Opacity of unchanged pixels in diff images.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_threshold() -> f64 {
    0.1
}

fn default_alpha() -> f64 {
    0.1
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            include_aa: false,
            alpha: default_alpha(),
        }
    }
}

//! Browser configuration.

use serde::{Deserialize, Serialize};

/// Chrome launch and page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port; each player in a duel uses `debug_port + index`.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Run Chrome without a window.
    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_device_scale_factor")]
    pub device_scale_factor: f64,

    /// Chrome user data directory. A temporary one is used if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<String>,

    /// Explicit Chrome binary. Searched for if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1000
}

fn default_viewport_height() -> u32 {
    800
}

fn default_device_scale_factor() -> f64 {
    1.0
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            device_scale_factor: default_device_scale_factor(),
            profile_dir: None,
            chrome_path: None,
        }
    }
}

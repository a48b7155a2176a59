//! Game page configuration (URLs, selectors, key bindings).

use serde::{Deserialize, Serialize};

/// Where the game lives and how to drive its page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game page.
    #[serde(default = "default_url")]
    pub url: String,

    /// URL of the identity query issued after login (matched on GET).
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub keys: KeyConfig,
}

fn default_url() -> String {
    "http://1.15.175.5/".to_string()
}

fn default_identity_url() -> String {
    "https://app2703.acapp.acwing.com.cn/api/user/account/info/".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            identity_url: default_identity_url(),
            selectors: SelectorConfig::default(),
            keys: KeyConfig::default(),
        }
    }
}

/// CSS selectors for the page elements the session touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Button that opens the login drawer.
    #[serde(default = "default_open_login")]
    pub open_login: String,

    /// Inputs for name and password, in that order.
    #[serde(default = "default_credential_inputs")]
    pub credential_inputs: String,

    #[serde(default = "default_login_button")]
    pub login_button: String,

    #[serde(default = "default_match_button")]
    pub match_button: String,

    /// The game surface captured each step.
    #[serde(default = "default_canvas")]
    pub canvas: String,
}

fn default_open_login() -> String {
    ".header .el-button:first-of-type".to_string()
}

fn default_credential_inputs() -> String {
    "input".to_string()
}

fn default_login_button() -> String {
    ".login-btn".to_string()
}

fn default_match_button() -> String {
    ".match-btn".to_string()
}

fn default_canvas() -> String {
    "canvas".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            open_login: default_open_login(),
            credential_inputs: default_credential_inputs(),
            login_button: default_login_button(),
            match_button: default_match_button(),
            canvas: default_canvas(),
        }
    }
}

/// DOM key codes sent for each direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    #[serde(default = "default_up")]
    pub up: String,

    #[serde(default = "default_right")]
    pub right: String,

    #[serde(default = "default_down")]
    pub down: String,

    #[serde(default = "default_left")]
    pub left: String,
}

fn default_up() -> String {
    "KeyW".to_string()
}

fn default_right() -> String {
    "KeyD".to_string()
}

fn default_down() -> String {
    "KeyS".to_string()
}

fn default_left() -> String {
    "KeyA".to_string()
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            up: default_up(),
            right: default_right(),
            down: default_down(),
            left: default_left(),
        }
    }
}

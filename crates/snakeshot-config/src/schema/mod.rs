//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

mod schema_board;
mod schema_browser;
mod schema_game;
mod schema_run;

pub use schema_board::*;
pub use schema_browser::*;
pub use schema_game::*;
pub use schema_run::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diff: DiffConfig,

    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}

impl Config {
    /// Look up a player's credentials by name.
    pub fn player(&self, name: &str) -> Result<&PlayerConfig, ConfigError> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownPlayer(name.to_string()))
    }
}

/// Credentials for one game account.
#[derive(Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,

    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

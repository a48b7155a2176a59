//! Board geometry and planning seeds.

use serde::{Deserialize, Serialize};

/// Usable board area and planner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_min_row")]
    pub min_row: i32,

    #[serde(default = "default_max_row")]
    pub max_row: i32,

    #[serde(default = "default_min_col")]
    pub min_col: i32,

    #[serde(default = "default_max_col")]
    pub max_col: i32,

    /// Length cap of a planned move sequence (1..=16).
    #[serde(default = "default_max_moves")]
    pub max_moves: usize,

    #[serde(default)]
    pub candidates: CandidatesConfig,
}

fn default_min_row() -> i32 {
    1
}

fn default_max_row() -> i32 {
    12
}

fn default_min_col() -> i32 {
    1
}

fn default_max_col() -> i32 {
    13
}

fn default_max_moves() -> usize {
    16
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_row: default_min_row(),
            max_row: default_max_row(),
            min_col: default_min_col(),
            max_col: default_max_col(),
            max_moves: default_max_moves(),
            candidates: CandidatesConfig::default(),
        }
    }
}

/// Seed candidates per role. Each list must hold exactly two entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesConfig {
    #[serde(default = "default_player_a")]
    pub player_a: Vec<CandidateConfig>,

    #[serde(default = "default_player_b")]
    pub player_b: Vec<CandidateConfig>,
}

fn default_player_a() -> Vec<CandidateConfig> {
    vec![
        CandidateConfig::new(10, 1, "up"),
        CandidateConfig::new(11, 2, "right"),
    ]
}

fn default_player_b() -> Vec<CandidateConfig> {
    vec![
        CandidateConfig::new(2, 12, "down"),
        CandidateConfig::new(1, 11, "left"),
    ]
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            player_a: default_player_a(),
            player_b: default_player_b(),
        }
    }
}

/// A seed cell and the seed move that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub row: i32,
    pub col: i32,
    /// One of `up`, `right`, `down`, `left`.
    pub direction: String,
}

impl CandidateConfig {
    pub fn new(row: i32, col: i32, direction: impl Into<String>) -> Self {
        Self {
            row,
            col,
            direction: direction.into(),
        }
    }
}

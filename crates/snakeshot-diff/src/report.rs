//! The persisted diff log.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Intra-session diff percentages, one list per session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EachPlayer {
    pub player1: Vec<String>,
    pub player2: Vec<String>,
}

/// Per-step and per-session divergence of two recordings.
///
/// Serialized as `diff-log.json`:
///
/// ```json
/// { "eachPlayer": { "player1": ["1.23%"], "player2": ["0.00%"] },
///   "eachStep": ["0.00%", "4.56%"], "totalStep": 2 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub each_player: EachPlayer,
    pub each_step: Vec<String>,
    pub total_step: usize,
}

impl DiffReport {
    /// Check the length invariants: `total_step` cross-session entries and
    /// `total_step - 1` entries per session.
    pub fn validate(&self) -> DiffResult<()> {
        if self.total_step == 0 {
            return Err(DiffError::InvalidReport("totalStep is 0".to_string()));
        }
        if self.each_step.len() != self.total_step {
            return Err(DiffError::InvalidReport(format!(
                "eachStep has {} entries, expected {}",
                self.each_step.len(),
                self.total_step
            )));
        }
        let expected = self.total_step - 1;
        for (name, list) in [
            ("player1", &self.each_player.player1),
            ("player2", &self.each_player.player2),
        ] {
            if list.len() != expected {
                return Err(DiffError::InvalidReport(format!(
                    "eachPlayer.{} has {} entries, expected {}",
                    name,
                    list.len(),
                    expected
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> DiffResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a diff log.
    pub fn from_json(text: &str) -> DiffResult<Self> {
        let report: DiffReport = serde_json::from_str(text)?;
        report.validate()?;
        Ok(report)
    }

    pub fn save(&self, path: &Path) -> DiffResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| DiffError::io(path, e))
    }

    pub fn load(path: &Path) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DiffError::io(path, e))?;
        Self::from_json(&text)
    }
}

//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{CandidateConfig, Config};

const DIRECTIONS: [&str; 4] = ["up", "right", "down", "left"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(ConfigError::InvalidValue {
                field: first.path,
                message: first.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_game(config, &mut result);
        Self::validate_board(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_output(config, &mut result);
        Self::validate_diff(config, &mut result);
        Self::validate_players(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;
        if browser.debug_port == 0 {
            result.add_error(ValidationError::new("browser.debug_port", "Port cannot be 0"));
        }

        if browser.viewport_width == 0 || browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "Viewport width and height must be greater than 0",
            ));
        } else if browser.headless && (browser.viewport_width < 400 || browser.viewport_height < 300) {
            result.add_warning(ValidationWarning::new(
                "browser.viewport",
                "Headless with a very small viewport; the canvas may be clipped",
            ));
        }

        if browser.device_scale_factor.is_nan() || browser.device_scale_factor <= 0.0 {
            result.add_error(ValidationError::new(
                "browser.device_scale_factor",
                "device_scale_factor must be greater than 0",
            ));
        }
    }

    fn validate_game(config: &Config, result: &mut ValidationResult) {
        for (path, url) in [
            ("game.url", &config.game.url),
            ("game.identity_url", &config.game.identity_url),
        ] {
            if url.is_empty() {
                result.add_error(ValidationError::new(path, "URL cannot be empty"));
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                ));
            }
        }

        let selectors = &config.game.selectors;
        for (name, value) in [
            ("open_login", &selectors.open_login),
            ("credential_inputs", &selectors.credential_inputs),
            ("login_button", &selectors.login_button),
            ("match_button", &selectors.match_button),
            ("canvas", &selectors.canvas),
        ] {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("game.selectors.{}", name),
                    "Selector cannot be empty",
                ));
            }
        }

        let keys = &config.game.keys;
        for (name, value) in [
            ("up", &keys.up),
            ("right", &keys.right),
            ("down", &keys.down),
            ("left", &keys.left),
        ] {
            if value.is_empty() {
                result.add_error(ValidationError::new(
                    format!("game.keys.{}", name),
                    "Key code cannot be empty",
                ));
            }
        }
    }

    fn validate_board(config: &Config, result: &mut ValidationResult) {
        let board = &config.board;
        if board.min_row > board.max_row || board.min_col > board.max_col {
            result.add_error(ValidationError::new(
                "board",
                format!(
                    "Invalid bounds: rows {}..={}, cols {}..={}",
                    board.min_row, board.max_row, board.min_col, board.max_col
                ),
            ));
        }
        if board.min_row < 0 || board.min_col < 0 {
            result.add_error(ValidationError::new(
                "board",
                "Bounds cannot be negative",
            ));
        }

        if !(1..=16).contains(&board.max_moves) {
            result.add_error(ValidationError::new(
                "board.max_moves",
                "max_moves must be between 1 and 16",
            ));
        }

        Self::validate_candidates("board.candidates.player_a", &board.candidates.player_a, result);
        Self::validate_candidates("board.candidates.player_b", &board.candidates.player_b, result);
    }

    fn validate_candidates(path: &str, candidates: &[CandidateConfig], result: &mut ValidationResult) {
        if candidates.len() != 2 {
            result.add_error(ValidationError::new(
                path,
                format!("Exactly 2 candidates required, found {}", candidates.len()),
            ));
        }

        for (i, candidate) in candidates.iter().enumerate() {
            if !DIRECTIONS.contains(&candidate.direction.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}[{}].direction", path, i),
                    format!(
                        "Unknown direction '{}', valid values: {:?}",
                        candidate.direction, DIRECTIONS
                    ),
                ));
            }
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;
        for (name, value) in [
            ("response_timeout_secs", timing.response_timeout_secs),
            ("push_timeout_secs", timing.push_timeout_secs),
            ("capture_timeout_secs", timing.capture_timeout_secs),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(
                    format!("timing.{}", name),
                    format!("{} must be greater than 0", name),
                ));
            }
        }
    }

    fn validate_output(config: &Config, result: &mut ValidationResult) {
        let output = &config.output;
        if output.frames_dir.is_empty() {
            result.add_error(ValidationError::new("output.frames_dir", "frames_dir cannot be empty"));
        }
        if output.report_dir.is_empty() {
            result.add_error(ValidationError::new("output.report_dir", "report_dir cannot be empty"));
        }
        if output.diff_dir_name.is_empty()
            || output.diff_dir_name.contains('/')
            || output.diff_dir_name.contains('\\')
        {
            result.add_error(ValidationError::new(
                "output.diff_dir_name",
                "diff_dir_name must be a single non-empty path component",
            ));
        }
    }

    fn validate_diff(config: &Config, result: &mut ValidationResult) {
        let diff = &config.diff;
        if !(0.0..=1.0).contains(&diff.threshold) {
            result.add_error(ValidationError::new(
                "diff.threshold",
                "threshold must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&diff.alpha) {
            result.add_error(ValidationError::new(
                "diff.alpha",
                "alpha must be between 0 and 1",
            ));
        }
    }

    fn validate_players(config: &Config, result: &mut ValidationResult) {
        if config.players.is_empty() {
            result.add_warning(ValidationWarning::new(
                "players",
                "No players configured; play and duel need [[players]] entries",
            ));
        } else if config.players.len() < 2 {
            result.add_warning(ValidationWarning::new(
                "players",
                "Only one player configured; duel needs two",
            ));
        }

        for (i, player) in config.players.iter().enumerate() {
            if player.name.is_empty() {
                result.add_error(ValidationError::new(
                    format!("players[{}].name", i),
                    "Player name cannot be empty",
                ));
            }
            if player.password.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("players[{}].password", i),
                    "Password is empty; set it directly or through ${VAR}",
                ));
            }
            if config.players[..i].iter().any(|p| p.name == player.name) {
                result.add_error(ValidationError::new(
                    format!("players[{}].name", i),
                    format!("Duplicate player name '{}'", player.name),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

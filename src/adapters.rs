//! Conversions from the file configuration to each crate's runtime settings.

use std::path::PathBuf;
use std::time::Duration;

use snakeshot_browser::{BrowserManagerConfig, GameUiConfig, KeyBindings, SelectorSet};
use snakeshot_config::{CandidateConfig, Config, ConfigError, ConfigLoader, PlayerConfig};
use snakeshot_core::SessionConfig;
use snakeshot_diff::DiffOptions;
use snakeshot_protocols::{Bounds, Credentials, Direction, StartCandidate};
use url::Url;

/// Error type shared by the command handlers.
pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Name of the report document inside `output.report_dir`.
pub(crate) const REPORT_FILE: &str = "report.html";

/// Get the ~/.snakeshot directory path.
pub(crate) fn snakeshot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".snakeshot"))
        .unwrap_or_else(|| PathBuf::from(".snakeshot"))
}

pub(crate) fn frames_root(config: &Config) -> PathBuf {
    PathBuf::from(ConfigLoader::expand_path(&config.output.frames_dir))
}

pub(crate) fn report_path(config: &Config) -> PathBuf {
    PathBuf::from(ConfigLoader::expand_path(&config.output.report_dir)).join(REPORT_FILE)
}

pub(crate) fn session_config(config: &Config) -> Result<SessionConfig, ConfigError> {
    let board = &config.board;
    let bounds = Bounds::new(board.min_row, board.max_row, board.min_col, board.max_col)
        .map_err(|e| invalid("board", e))?;

    let timing = &config.timing;
    Ok(SessionConfig {
        bounds,
        player_a_candidates: candidate_pair(
            "board.candidates.player_a",
            &board.candidates.player_a,
        )?,
        player_b_candidates: candidate_pair(
            "board.candidates.player_b",
            &board.candidates.player_b,
        )?,
        max_moves: board.max_moves,
        response_timeout: Duration::from_secs(timing.response_timeout_secs),
        push_timeout: Duration::from_secs(timing.push_timeout_secs),
        capture_timeout: Duration::from_secs(timing.capture_timeout_secs),
        step_settle: Duration::from_millis(timing.step_settle_ms),
        frames_root: frames_root(config),
    })
}

fn candidate_pair(
    field: &str,
    candidates: &[CandidateConfig],
) -> Result<[StartCandidate; 2], ConfigError> {
    let parsed = candidates
        .iter()
        .map(|c| -> Result<StartCandidate, ConfigError> {
            let direction: Direction = c.direction.parse().map_err(|e| invalid(field, e))?;
            Ok(StartCandidate::new(c.row, c.col, direction))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = parsed.len();
    parsed
        .try_into()
        .map_err(|_| invalid(field, format!("exactly 2 candidates required, found {}", count)))
}

pub(crate) fn diff_options(config: &Config) -> DiffOptions {
    DiffOptions {
        threshold: config.diff.threshold,
        include_aa: config.diff.include_aa,
        alpha: config.diff.alpha,
    }
}

/// Browser settings for the `index`-th concurrent player.
///
/// Each player gets its own debugging port and therefore its own profile.
pub(crate) fn browser_config(config: &Config, index: u16) -> Result<BrowserManagerConfig, ConfigError> {
    let browser = &config.browser;
    let debug_port = browser
        .debug_port
        .checked_add(index)
        .ok_or_else(|| invalid("browser.debug_port", "port range exhausted"))?;

    Ok(BrowserManagerConfig {
        debug_port,
        viewport_width: browser.viewport_width,
        viewport_height: browser.viewport_height,
        device_scale_factor: browser.device_scale_factor,
        profile_dir: browser
            .profile_dir
            .as_deref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(p))),
        headless: browser.headless,
        chrome_path: browser
            .chrome_path
            .as_deref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(p))),
    })
}

pub(crate) fn game_ui_config(config: &Config) -> Result<GameUiConfig, ConfigError> {
    let game = &config.game;
    let identity_url =
        Url::parse(&game.identity_url).map_err(|e| invalid("game.identity_url", e))?;

    Ok(GameUiConfig {
        identity_url,
        selectors: SelectorSet {
            open_login: game.selectors.open_login.clone(),
            credential_inputs: game.selectors.credential_inputs.clone(),
            login_button: game.selectors.login_button.clone(),
            match_button: game.selectors.match_button.clone(),
            canvas: game.selectors.canvas.clone(),
        },
        keys: KeyBindings {
            up: game.keys.up.clone(),
            right: game.keys.right.clone(),
            down: game.keys.down.clone(),
            left: game.keys.left.clone(),
        },
        drawer_settle: Duration::from_millis(config.timing.drawer_settle_ms),
        element_timeout: Duration::from_secs(config.timing.response_timeout_secs),
    })
}

pub(crate) fn credentials(player: &PlayerConfig) -> Credentials {
    Credentials::new(player.name.clone(), player.password.clone())
}

pub(crate) fn teardown_grace(config: &Config) -> Duration {
    Duration::from_millis(config.timing.teardown_grace_ms)
}

fn invalid(field: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_from_defaults() {
        let session = session_config(&Config::default()).unwrap();
        assert_eq!(session.bounds, Bounds::new(1, 12, 1, 13).unwrap());
        assert_eq!(
            session.player_a_candidates,
            [
                StartCandidate::new(10, 1, Direction::Up),
                StartCandidate::new(11, 2, Direction::Right),
            ]
        );
        assert_eq!(
            session.player_b_candidates,
            [
                StartCandidate::new(2, 12, Direction::Down),
                StartCandidate::new(1, 11, Direction::Left),
            ]
        );
        assert_eq!(session.max_moves, 16);
        assert_eq!(session.push_timeout, Duration::from_secs(60));
        assert_eq!(session.step_settle, Duration::from_millis(1000));
        assert_eq!(session.frames_root, PathBuf::from("temp"));
    }

    #[test]
    fn test_session_config_rejects_bad_candidates() {
        let mut config = Config::default();
        config.board.candidates.player_b.push(CandidateConfig::new(1, 1, "up"));
        let err = session_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "board.candidates.player_b"
        ));

        let mut config = Config::default();
        config.board.candidates.player_a[0].direction = "sideways".to_string();
        assert!(session_config(&config).is_err());
    }

    #[test]
    fn test_session_config_rejects_bad_bounds() {
        let mut config = Config::default();
        config.board.min_col = 20;
        let err = session_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "board"));
    }

    #[test]
    fn test_browser_config_offsets_port() {
        let config = Config::default();
        assert_eq!(browser_config(&config, 0).unwrap().debug_port, 9222);
        assert_eq!(browser_config(&config, 1).unwrap().debug_port, 9223);

        let mut config = Config::default();
        config.browser.debug_port = u16::MAX;
        assert!(browser_config(&config, 1).is_err());
    }

    #[test]
    fn test_browser_config_expands_paths() {
        let mut config = Config::default();
        config.browser.profile_dir = Some("~/profiles".to_string());
        let browser = browser_config(&config, 0).unwrap();
        let profile = browser.profile_dir.unwrap();
        assert!(!profile.starts_with("~"));
        assert!(profile.ends_with("profiles"));
    }

    #[test]
    fn test_game_ui_config() {
        let ui = game_ui_config(&Config::default()).unwrap();
        assert_eq!(ui.identity_url.host_str(), Some("app2703.acapp.acwing.com.cn"));
        assert_eq!(ui.keys.code_for(Direction::Down), "KeyS");
        assert_eq!(ui.selectors.canvas, "canvas");
        assert_eq!(ui.drawer_settle, Duration::from_millis(1000));

        let mut config = Config::default();
        config.game.identity_url = "not a url".to_string();
        assert!(game_ui_config(&config).is_err());
    }

    #[test]
    fn test_diff_options_and_paths() {
        let mut config = Config::default();
        config.diff.threshold = 0.25;
        assert_eq!(diff_options(&config).threshold, 0.25);
        assert_eq!(report_path(&config), PathBuf::from("result/report.html"));
        assert_eq!(teardown_grace(&config), Duration::from_secs(8));
    }
}

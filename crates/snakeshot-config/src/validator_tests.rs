use super::*;
use crate::schema::PlayerConfig;

fn with_players() -> Config {
    let mut config = Config::default();
    for name in ["terry", "111"] {
        config.players.push(PlayerConfig {
            name: name.to_string(),
            password: "pw".to_string(),
        });
    }
    config
}

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    // No players configured.
    assert!(result.warnings.iter().any(|w| w.path == "players"));
}

#[test]
fn test_validate_configured_players_has_no_warnings() {
    let result = ConfigValidator::validate(&with_players());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_bounds() {
    let mut config = with_players();
    config.board.min_row = 5;
    config.board.max_row = 2;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "board"));
}

#[test]
fn test_validate_candidate_count() {
    let mut config = with_players();
    config.board.candidates.player_b.pop();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "board.candidates.player_b"));
}

#[test]
fn test_validate_bad_direction() {
    let mut config = with_players();
    config.board.candidates.player_a[1].direction = "north".to_string();

    let result = ConfigValidator::validate(&config);
    let err = result
        .errors
        .iter()
        .find(|e| e.path == "board.candidates.player_a[1].direction")
        .unwrap();
    assert!(err.message.contains("north"));
}

#[test]
fn test_validate_threshold_range() {
    let mut config = with_players();
    config.diff.threshold = 1.5;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "diff.threshold"));

    config.diff.threshold = 0.0;
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_max_moves_range() {
    let mut config = with_players();
    config.board.max_moves = 0;
    assert!(!ConfigValidator::validate(&config).is_valid());

    config.board.max_moves = 17;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "board.max_moves"));
}

#[test]
fn test_validate_zero_timeouts() {
    let mut config = with_players();
    config.timing.push_timeout_secs = 0;
    config.timing.capture_timeout_secs = 0;

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().any(|e| e.path == "timing.push_timeout_secs"));
}

#[test]
fn test_zero_settle_is_allowed() {
    let mut config = with_players();
    config.timing.step_settle_ms = 0;
    config.timing.teardown_grace_ms = 0;
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_empty_url() {
    let mut config = with_players();
    config.game.url = String::new();
    config.game.identity_url = "ftp://example.com".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "game.url"));
    assert!(result.errors.iter().any(|e| e.path == "game.identity_url"));
}

#[test]
fn test_validate_empty_selector() {
    let mut config = with_players();
    config.game.selectors.canvas = " ".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "game.selectors.canvas"));
}

#[test]
fn test_headless_small_viewport_warning() {
    let mut config = with_players();
    config.browser.headless = true;
    config.browser.viewport_width = 200;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "browser.viewport"));
}

#[test]
fn test_validate_duplicate_player() {
    let mut config = with_players();
    config.players.push(PlayerConfig {
        name: "terry".to_string(),
        password: "x".to_string(),
    });
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.message.contains("Duplicate")));
}

#[test]
fn test_empty_password_warning() {
    let mut config = with_players();
    config.players[0].password.clear();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "players[0].password"));
}

#[test]
fn test_diff_dir_name_must_be_single_component() {
    let mut config = with_players();
    config.output.diff_dir_name = "a/b".to_string();
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_into_result() {
    let ok = ConfigValidator::validate(&with_players()).into_result();
    assert!(ok.unwrap().is_empty());

    let mut config = with_players();
    config.board.max_moves = 40;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "board.max_moves"));
}

#[test]
fn test_validation_result_default() {
    let result = ValidationResult::default();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

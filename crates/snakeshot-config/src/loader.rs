//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables written as `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = String::with_capacity(content.len());
        let mut last = 0;
        for cap in re.captures_iter(content) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            let var_name = &cap[1];
            let value = match (std::env::var(var_name), cap.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => return Err(ConfigError::EnvVarNotSet(var_name.to_string())),
            };
            result.push_str(&content[last..whole.start()]);
            result.push_str(&value);
            last = whole.end();
        }
        result.push_str(&content[last..]);

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/snakeshot`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.browser.debug_port, 9222);
        assert_eq!(config.board.max_moves, 16);
        assert!(config.players.is_empty());
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [browser]
            debug_port = 9333
            headless = true

            [timing]
            push_timeout_secs = 5
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser.debug_port, 9333);
        assert!(config.browser.headless);
        assert_eq!(config.timing.push_timeout_secs, 5);
        assert_eq!(config.timing.response_timeout_secs, 30);
    }

    #[test]
    fn test_load_players() {
        let content = r#"
            [[players]]
            name = "terry"
            password = "12345"

            [[players]]
            name = "111"
            password = "111"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.player("111").unwrap().password, "111");
        assert!(config.player("nobody").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]").unwrap();
        writeln!(file, "frames_dir = \"frames\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.output.frames_dir, "frames");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/snakeshot.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/snakeshot.toml")).unwrap();
        assert_eq!(config.output.diff_dir_name, "diff");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("SNAKESHOT_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${SNAKESHOT_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, "value = \"test_value\"");
        unsafe {
            std::env::remove_var("SNAKESHOT_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_in_password() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("SNAKESHOT_TEST_PASSWORD", "s3cret");
        }
        let content = r#"
            [[players]]
            name = "terry"
            password = "${SNAKESHOT_TEST_PASSWORD}"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.players[0].password, "s3cret");
        unsafe {
            std::env::remove_var("SNAKESHOT_TEST_PASSWORD");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_SNAKESHOT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(v)) if v == "NONEXISTENT_SNAKESHOT_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_default() {
        let content = "a = \"${NONEXISTENT_SNAKESHOT_VAR_67890:-fallback}\"\nb = \"${NONEXISTENT_SNAKESHOT_VAR_67890:-}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, "a = \"fallback\"\nb = \"\"");
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here, $HOME stays\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_shipped_config_loads_and_validates() {
        let content = include_str!("../../../config/snakeshot.toml");
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.board.candidates.player_a.len(), 2);
        assert!(crate::ConfigValidator::validate(&config).is_valid());
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/snakeshot");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/snakeshot"));
    }
}

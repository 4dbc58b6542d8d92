//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

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

    /// Load configuration from a file if it exists, defaults otherwise.
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

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.autofill`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("autofill")
            .join("autofill.toml")
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
        assert_eq!(config.matcher.min_score, 0.7);
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_load_matcher_section() {
        let content = r#"
            [matcher]
            min_score = 0.8

            [matcher.keyword_categories]
            motifs = ["motif", "raison"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.matcher.min_score, 0.8);
        assert_eq!(config.matcher.keyword_categories.len(), 1);
        assert_eq!(config.matcher.keyword_categories["motifs"], vec!["motif", "raison"]);
    }

    #[test]
    fn test_load_upload_section() {
        let content = r#"
            [upload]
            enabled = false
            field_delay_ms = 10
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.upload.enabled);
        assert_eq!(config.upload.field_delay_ms, 10);
        assert_eq!(config.upload.ready_retries, 3);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[highlight]").unwrap();
        writeln!(file, "class_name = \"needs-review\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.highlight.class_name, "needs-review");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/autofill.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/autofill.toml")).unwrap();
        assert_eq!(config.highlight.class_name, "autofill-unfilled");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("AUTOFILL_TEST_PROFILE", "/tmp/profile.json");
        }
        let content = "[profile]\npath = \"${AUTOFILL_TEST_PROFILE}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.profile.path.as_deref(), Some("/tmp/profile.json"));
        unsafe {
            std::env::remove_var("AUTOFILL_TEST_PROFILE");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_AUTOFILL_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/profile.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("profile.json"));
    }
}

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .cc-reviewers.toml.
///
/// Every field is optional; the tool runs with zero config in CI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,

    /// REST API root, for GitHub Enterprise installs.
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from .cc-reviewers.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".cc-reviewers.toml");
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The GitHub token, if any. `load` has already applied the
    /// GITHUB_TOKEN fallback.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|token| !token.is_empty())
    }

    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
token = "ghp_example"
api_url = "https://github.example.com/api/v3"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_example"));
        assert_eq!(config.github_token().as_deref(), Some("ghp_example"));
        assert_eq!(config.api_url(), "https://github.example.com/api/v3");
    }

    #[test]
    fn test_github_token_reads_only_config() {
        let config = Config::default();
        assert!(config.github_token().is_none());

        let mut config = Config::default();
        config.github.token = Some(String::new());
        assert!(config.github_token().is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from(Path::new("/nonexistent/.cc-reviewers.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}

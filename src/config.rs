//! Configuration management for docqa
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DocqaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for docqa
///
/// This structure holds all configuration needed by the client: backend
/// connection settings, authentication behavior, retry policy for rubric
/// evaluation, and the fallback criteria list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Retry policy for rubric question attempts
    #[serde(default)]
    pub retry: RetryConfig,

    /// Rubric evaluation settings
    #[serde(default)]
    pub evaluate: EvaluateConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the document-QA service (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:50505".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Authentication configuration
///
/// When `use_login` is true and `app_services` is false, requests carry an
/// `Authorization: Bearer <token>` header whenever a token is available.
/// With `app_services` enabled the platform injects credentials itself and
/// the client attaches nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether the backend requires login
    #[serde(default)]
    pub use_login: bool,

    /// Whether an app-service token source handles auth out-of-band
    #[serde(default)]
    pub app_services: bool,

    /// Environment variable to read the bearer token from
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    "DOCQA_TOKEN".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            use_login: false,
            app_services: false,
            token_env: default_token_env(),
        }
    }
}

/// Retry configuration for rubric question attempts
///
/// The delay is fixed per attempt; there is no backoff or jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Delay between attempts as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Rubric evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvaluateConfig {
    /// Criteria used when no rubric file is supplied or selected
    #[serde(default)]
    pub default_criteria: Vec<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DocqaError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DocqaError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("DOCQA_BACKEND_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("DOCQA_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid DOCQA_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(max_retries) = std::env::var("DOCQA_MAX_RETRIES") {
            if let Ok(value) = max_retries.parse() {
                self.retry.max_retries = value;
            } else {
                tracing::warn!("Invalid DOCQA_MAX_RETRIES: {}", max_retries);
            }
        }

        if let Ok(delay) = std::env::var("DOCQA_RETRY_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.retry.delay_ms = value;
            } else {
                tracing::warn!("Invalid DOCQA_RETRY_DELAY_MS: {}", delay);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(backend) = &cli.backend {
            self.backend.base_url = backend.clone();
        }
    }

    /// Read the bearer token from the configured environment variable
    ///
    /// Returns `None` when login is disabled or the variable is unset; a
    /// missing token is not an error — requests proceed unauthenticated.
    pub fn bearer_token(&self) -> Option<String> {
        if !self.auth.use_login {
            return None;
        }
        std::env::var(&self.auth.token_env).ok()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.is_empty() {
            return Err(DocqaError::Config("backend.base_url cannot be empty".to_string()).into());
        }

        if self.backend.base_url.ends_with('/') {
            return Err(DocqaError::Config(
                "backend.base_url must not end with a slash".to_string(),
            )
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(DocqaError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.retry.delay_ms == 0 {
            return Err(
                DocqaError::Config("retry.delay_ms must be greater than 0".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            auth: AuthConfig::default(),
            retry: RetryConfig::default(),
            evaluate: EvaluateConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:50505");
        assert_eq!(config.backend.timeout_seconds, 120);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.delay_ms, 1000);
        assert!(!config.auth.use_login);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_base_url() {
        let mut config = Config::default();
        config.backend.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_trailing_slash() {
        let mut config = Config::default();
        config.backend.base_url = "http://localhost:50505/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_delay() {
        let mut config = Config::default();
        config.retry.delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_config_delay() {
        let retry = RetryConfig {
            max_retries: 5,
            delay_ms: 250,
        };
        assert_eq!(retry.delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
backend:
  base_url: "https://docqa.example.com"
  timeout_seconds: 30
auth:
  use_login: true
retry:
  max_retries: 3
  delay_ms: 500
evaluate:
  default_criteria:
    - "Is our liability limited, if so what is the amount of the liability cap?"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "https://docqa.example.com");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert!(config.auth.use_login);
        assert!(!config.auth.app_services);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.evaluate.default_criteria.len(), 1);
    }

    #[test]
    fn test_bearer_token_disabled_login() {
        let config = Config::default();
        assert!(config.bearer_token().is_none());
    }
}

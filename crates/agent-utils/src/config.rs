//! Configuration management utilities
//!
//! Settings come from the process environment. A `.env` file in the working
//! directory (or any parent) is loaded first when present.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::LogFormat;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("missing required environment variable: {0}")]
    Missing(String),

    /// Variable is set but could not be parsed
    #[error("invalid value for {key}: {value}")]
    Invalid {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },
}

/// Load variables from a `.env` file if one exists.
///
/// Variables already present in the environment win.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env file: {e}"),
    }
}

/// Read a required variable; empty values count as missing.
pub fn require_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

/// Read a variable or fall back to `default`.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a variable, using `default` when it is unset.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "lunar-agent".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Build from `APP_ENV` and `LOG_FORMAT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            app_name: defaults.app_name,
            environment: env_or("APP_ENV", &defaults.environment),
            log_format: env_parse("LOG_FORMAT", defaults.log_format)?,
        })
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so parallel tests don't collide.

    #[test]
    fn test_require_env() {
        // SAFETY: test-local variable names
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_REQUIRED", "value");
            std::env::set_var("AGENT_UTILS_TEST_BLANK", "   ");
        }
        assert_eq!(require_env("AGENT_UTILS_TEST_REQUIRED").unwrap(), "value");
        assert_eq!(
            require_env("AGENT_UTILS_TEST_BLANK"),
            Err(ConfigError::Missing("AGENT_UTILS_TEST_BLANK".to_string()))
        );
        assert!(require_env("AGENT_UTILS_TEST_NEVER_SET").is_err());
    }

    #[test]
    fn test_env_parse() {
        // SAFETY: test-local variable names
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_NUM", "42");
            std::env::set_var("AGENT_UTILS_TEST_BAD_NUM", "forty-two");
        }
        assert_eq!(env_parse("AGENT_UTILS_TEST_NUM", 0u64).unwrap(), 42);
        assert_eq!(env_parse("AGENT_UTILS_TEST_UNSET_NUM", 7u64).unwrap(), 7);
        assert!(matches!(
            env_parse("AGENT_UTILS_TEST_BAD_NUM", 0u64),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_env_or() {
        assert_eq!(env_or("AGENT_UTILS_TEST_UNSET_STR", "fallback"), "fallback");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "lunar-agent");
        assert!(!config.is_production());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}

//! Configuration for the LunarCrush client and tweet pipeline

use crate::error::{LunarError, Result};
use crate::policy::WindowPolicy;
use agent_utils::{env_or, env_parse, require_env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default LunarCrush API base
pub const DEFAULT_BASE_URL: &str = "https://lunarcrush.com/api4";

/// Configuration for the lunar agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunarConfig {
    /// LunarCrush bearer token
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Fixed delay slept before every request
    pub request_delay: Duration,

    /// Retries after an HTTP 429
    pub max_retries: u32,

    /// First retry backoff, doubled per attempt
    pub retry_backoff_base: Duration,

    /// Backoff ceiling
    pub max_backoff: Duration,

    /// Response cache TTL
    pub cache_ttl: Duration,

    /// Probability of picking a personality tweet
    pub personality_weight: f64,

    /// Generation attempts before falling back to a static quip
    pub max_generation_attempts: usize,

    /// SQLite file for tweet history; in-memory only when `None`
    pub database_path: Option<PathBuf>,

    /// Dedup, cooldown and retention windows
    pub windows: WindowPolicy,
}

impl Default for LunarConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_secs(2),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300), // 5 minutes
            personality_weight: 0.7,
            max_generation_attempts: 3,
            database_path: Some(PathBuf::from("tweets.db")),
            windows: WindowPolicy::default(),
        }
    }
}

impl LunarConfig {
    /// Create a new configuration builder
    pub fn builder() -> LunarConfigBuilder {
        LunarConfigBuilder::default()
    }

    /// Build from environment variables
    ///
    /// `LUNAR_API_KEY` is required. `LUNAR_BASE_URL`, `LUNAR_REQUEST_DELAY_MS`,
    /// `PERSONALITY_WEIGHT` and `TWEET_DB_PATH` are optional.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LunarError::Config(
                "LunarCrush API key is required".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(LunarError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.personality_weight) {
            return Err(LunarError::Config(format!(
                "personality_weight must be within [0, 1], got {}",
                self.personality_weight
            )));
        }

        if self.max_generation_attempts == 0 {
            return Err(LunarError::Config(
                "max_generation_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Backoff before retry `attempt` (0-based): `min(max, base * 2^attempt)`
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(self.max_backoff)
    }
}

/// Builder for LunarConfig
#[derive(Debug, Default)]
pub struct LunarConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    request_delay: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    max_backoff: Option<Duration>,
    cache_ttl: Option<Duration>,
    personality_weight: Option<f64>,
    max_generation_attempts: Option<usize>,
    database_path: Option<Option<PathBuf>>,
    windows: Option<WindowPolicy>,
}

impl LunarConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the throttle delay
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = Some(delay);
        self
    }

    /// Set maximum retries on 429
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the backoff ceiling
    pub fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = Some(duration);
        self
    }

    /// Set the response cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the personality probability
    pub fn personality_weight(mut self, weight: f64) -> Self {
        self.personality_weight = Some(weight);
        self
    }

    /// Set generation attempts
    pub fn max_generation_attempts(mut self, attempts: usize) -> Self {
        self.max_generation_attempts = Some(attempts);
        self
    }

    /// Set the SQLite path
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(Some(path.into()));
        self
    }

    /// Keep tweet history in memory only
    pub fn in_memory_history(mut self) -> Self {
        self.database_path = Some(None);
        self
    }

    /// Set the window policy
    pub fn windows(mut self, windows: WindowPolicy) -> Self {
        self.windows = Some(windows);
        self
    }

    /// Fill unset fields from the environment
    pub fn with_env(mut self) -> Result<Self> {
        if self.api_key.is_none() {
            self.api_key = Some(require_env("LUNAR_API_KEY")?);
        }
        if self.base_url.is_none() {
            self.base_url = Some(env_or("LUNAR_BASE_URL", DEFAULT_BASE_URL));
        }
        if self.request_delay.is_none() {
            let millis = env_parse("LUNAR_REQUEST_DELAY_MS", 2000_u64)?;
            self.request_delay = Some(Duration::from_millis(millis));
        }
        if self.personality_weight.is_none() {
            self.personality_weight = Some(env_parse("PERSONALITY_WEIGHT", 0.7_f64)?);
        }
        if self.database_path.is_none() {
            if let Ok(path) = std::env::var("TWEET_DB_PATH") {
                self.database_path = Some(Some(PathBuf::from(path)));
            }
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<LunarConfig> {
        let defaults = LunarConfig::default();

        let config = LunarConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_delay: self.request_delay.unwrap_or(defaults.request_delay),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            personality_weight: self.personality_weight.unwrap_or(defaults.personality_weight),
            max_generation_attempts: self
                .max_generation_attempts
                .unwrap_or(defaults.max_generation_attempts),
            database_path: self.database_path.unwrap_or(defaults.database_path),
            windows: self.windows.unwrap_or(defaults.windows),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LunarConfig::default();
        assert_eq!(config.base_url, "https://lunarcrush.com/api4");
        assert_eq!(config.request_delay, Duration::from_secs(2));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!((config.personality_weight - 0.7).abs() < f64::EPSILON);
        // no key yet
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = LunarConfig::builder()
            .api_key("test-key")
            .max_retries(5)
            .request_delay(Duration::ZERO)
            .in_memory_history()
            .build()
            .unwrap();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_delay, Duration::ZERO);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(LunarConfig::builder().api_key("k").max_retries(0).build().is_err());
        assert!(
            LunarConfig::builder()
                .api_key("k")
                .personality_weight(1.5)
                .build()
                .is_err()
        );
        assert!(
            LunarConfig::builder()
                .api_key("k")
                .max_generation_attempts(0)
                .build()
                .is_err()
        );
        assert!(LunarConfig::builder().api_key("   ").build().is_err());
    }

    #[test]
    fn test_retry_backoff() {
        let config = LunarConfig::default();
        assert_eq!(config.retry_backoff(0), Duration::from_secs(1));
        assert_eq!(config.retry_backoff(1), Duration::from_secs(2));
        assert_eq!(config.retry_backoff(2), Duration::from_secs(4));
        assert_eq!(config.retry_backoff(5), Duration::from_secs(30));
        assert_eq!(config.retry_backoff(40), Duration::from_secs(30));
    }
}

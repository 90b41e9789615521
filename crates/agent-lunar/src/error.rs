//! Error types for the lunar agent

use thiserror::Error;

/// Errors raised by the API client, tweet store and configuration
#[derive(Debug, Error)]
pub enum LunarError {
    /// Upstream returned a non-success status
    #[error("HTTP {status} from LunarCrush: {body}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Still rate limited after every retry
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded {
        /// Requests made, including the first
        attempts: u32,
    },

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tweet store error
    #[error("Storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),

    /// Prompt template error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Upstream data missing or unusable
    #[error("Data not available: {0}")]
    DataUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for lunar operations
pub type Result<T> = std::result::Result<T, LunarError>;

impl LunarError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimitExceeded { .. } => Some(429),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LunarError {
    fn from(err: rusqlite::Error) -> Self {
        LunarError::Storage(tokio_rusqlite::Error::Rusqlite(err))
    }
}

impl From<agent_utils::ConfigError> for LunarError {
    fn from(err: agent_utils::ConfigError) -> Self {
        LunarError::Config(err.to_string())
    }
}

/// Convert LunarError to agent_core::Error
impl From<LunarError> for agent_core::Error {
    fn from(err: LunarError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

/// Convert agent_core::Error to LunarError
impl From<agent_core::Error> for LunarError {
    fn from(err: agent_core::Error) -> Self {
        LunarError::Other(err.to_string())
    }
}

/// Convert anyhow::Error to LunarError
impl From<anyhow::Error> for LunarError {
    fn from(err: anyhow::Error) -> Self {
        LunarError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LunarError::Http {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from LunarCrush: maintenance");
        assert_eq!(err.status(), Some(503));

        let err = LunarError::RateLimitExceeded { attempts: 4 };
        assert_eq!(err.to_string(), "Rate limit exceeded after 4 attempts");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_error_conversion() {
        let err = LunarError::DataUnavailable("no coins".to_string());
        let agent_err: agent_core::Error = err.into();

        match agent_err {
            agent_core::Error::ProcessingFailed(msg) => {
                assert!(msg.contains("no coins"));
            }
            _ => panic!("Expected ProcessingFailed variant"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: LunarError = agent_utils::ConfigError::Missing("LUNAR_API_KEY".into()).into();
        assert!(matches!(err, LunarError::Config(msg) if msg.contains("LUNAR_API_KEY")));
    }
}

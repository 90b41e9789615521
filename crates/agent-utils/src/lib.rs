//! Shared utilities for lunar-agent
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, env_or, env_parse, load_dotenv, require_env};
pub use logging::{LogFormat, init_tracing, init_tracing_with};

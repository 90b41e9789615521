//! Host runtime capabilities available to actions

use crate::{Character, Result};
use async_trait::async_trait;

/// Sampling parameters for a single text generation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
    /// Frequency penalty
    pub frequency_penalty: Option<f32>,
    /// Presence penalty
    pub presence_penalty: Option<f32>,
}

impl GenerationOptions {
    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the frequency penalty
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set the presence penalty
    pub fn presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }
}

/// Capability object the host hands to every action
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Character name
    fn agent_name(&self) -> &str;

    /// Full character
    fn character(&self) -> &Character;

    /// Prompt in, text out
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Read a cached value
    async fn cache_get(&self, key: &str) -> Option<serde_json::Value>;

    /// Write a cached value
    async fn cache_set(&self, key: &str, value: serde_json::Value);
}

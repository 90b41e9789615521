//! Core Action trait definition

use crate::{Content, Memory, Result, Runtime, State};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Free-form options the host passes through to a handler
pub type HandlerOptions = serde_json::Value;

/// Structured result returned by an action handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionOutput {
    /// A tweet ready for the host to post
    Tweet {
        /// Tweet text
        content: String,
        /// Data the tweet was built from
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Arbitrary structured data
    Data {
        /// Payload
        data: serde_json::Value,
    },
}

impl ActionOutput {
    /// Tweet text, if this is a tweet
    pub fn tweet_content(&self) -> Option<&str> {
        match self {
            Self::Tweet { content, .. } => Some(content),
            Self::Data { .. } => None,
        }
    }
}

/// Receives output an action emits while it runs
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    /// Deliver one piece of content
    async fn send(&self, content: Content) -> Result<()>;
}

/// Callback that keeps everything it receives
#[derive(Debug, Default)]
pub struct BufferedCallback {
    received: Mutex<Vec<Content>>,
}

impl BufferedCallback {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the buffered content, leaving the buffer empty
    pub async fn take(&self) -> Vec<Content> {
        std::mem::take(&mut *self.received.lock().await)
    }
}

#[async_trait]
impl HandlerCallback for BufferedCallback {
    async fn send(&self, content: Content) -> Result<()> {
        self.received.lock().await.push(content);
        Ok(())
    }
}

/// An action the host runtime can dispatch
///
/// Handlers never fail: unrecoverable problems are logged and reported as
/// `None`.
#[async_trait]
pub trait Action: Send + Sync {
    /// Canonical action name, e.g. `GENERATE_TWEET`
    fn name(&self) -> &str;

    /// Alternative names the action answers to
    fn similes(&self) -> &[&str] {
        &[]
    }

    /// Human-readable description
    fn description(&self) -> &str;

    /// Whether this action should run for `message`
    async fn validate(&self, runtime: &dyn Runtime, message: &Memory, state: &State) -> bool;

    /// Run the action
    async fn handle(
        &self,
        runtime: &dyn Runtime,
        message: &Memory,
        state: &mut State,
        options: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<ActionOutput>;

    /// Whether `name` refers to this action (case-insensitive, similes included)
    fn answers_to(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
            || self.similes().iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

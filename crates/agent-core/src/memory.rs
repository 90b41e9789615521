//! Messages exchanged between the host and actions

use serde::{Deserialize, Serialize};

/// Message payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Text body
    pub text: String,

    /// Action the sender asked for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Content {
    /// Text-only content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    /// Content tagged with the action that produced it
    pub fn with_action(text: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Some(action.into()),
        }
    }
}

/// A message handed to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// Who sent it
    pub user: String,

    /// What they sent
    pub content: Content,
}

impl Memory {
    /// Create a text message from `user`
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            content: Content::text(text),
        }
    }

    /// Request a specific action by name
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.content.action = Some(action.into());
        self
    }

    /// Message text
    pub fn text(&self) -> &str {
        &self.content.text
    }
}

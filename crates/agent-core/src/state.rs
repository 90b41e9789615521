//! Per-call state handed to actions
//!
//! `State` is a key-value store the runtime fills before dispatch (agent
//! name, bio, lore, recent messages) and actions may extend while handling.

use crate::Character;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known state keys
pub mod keys {
    /// Character name
    pub const AGENT_NAME: &str = "agentName";
    /// Character bio, joined
    pub const BIO: &str = "bio";
    /// Character lore, joined
    pub const LORE: &str = "lore";
    /// Recent conversation, newest last
    pub const RECENT_MESSAGES: &str = "recentMessages";
}

/// State passed to actions during validation and handling
///
/// # Example
///
/// ```
/// use agent_core::State;
///
/// let state = State::new().with_agent_name("kune").with_bio("gm");
/// assert_eq!(state.agent_name(), Some("kune"));
/// assert_eq!(state.bio(), Some("gm"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct State {
    data: HashMap<String, serde_json::Value>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed name, bio and lore from a character
    pub fn from_character(character: &Character) -> Self {
        Self::new()
            .with_agent_name(&character.name)
            .with_bio(character.bio_text())
            .with_lore(character.lore_text())
    }

    // =========== Builder Methods ===========

    /// Set the agent name
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.insert(keys::AGENT_NAME, serde_json::json!(name.into()));
        self
    }

    /// Set the bio
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.insert(keys::BIO, serde_json::json!(bio.into()));
        self
    }

    /// Set the lore
    pub fn with_lore(mut self, lore: impl Into<String>) -> Self {
        self.insert(keys::LORE, serde_json::json!(lore.into()));
        self
    }

    /// Set the recent messages
    pub fn with_recent_messages(mut self, messages: Vec<String>) -> Self {
        self.insert(keys::RECENT_MESSAGES, serde_json::json!(messages));
        self
    }

    // =========== Common Accessors ===========

    /// Agent name
    pub fn agent_name(&self) -> Option<&str> {
        self.get(keys::AGENT_NAME).and_then(|v| v.as_str())
    }

    /// Bio
    pub fn bio(&self) -> Option<&str> {
        self.get(keys::BIO).and_then(|v| v.as_str())
    }

    /// Lore
    pub fn lore(&self) -> Option<&str> {
        self.get(keys::LORE).and_then(|v| v.as_str())
    }

    /// Recent messages, empty when unset
    pub fn recent_messages(&self) -> Vec<String> {
        self.get_typed(keys::RECENT_MESSAGES)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value, serialized to JSON
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize state value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value, deserialized from JSON
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize state value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the state is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another state into this one (other values override)
    pub fn merge(&mut self, other: State) {
        self.data.extend(other.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Snapshot {
        price: f64,
        symbol: String,
    }

    #[test]
    fn test_basic_operations() {
        let mut state = State::new();
        assert!(state.is_empty());

        state.insert("key", serde_json::json!("value"));
        assert_eq!(state.len(), 1);
        assert!(state.contains_key("key"));

        state.remove("key");
        assert!(state.is_empty());
    }

    #[test]
    fn test_typed_insert_get() {
        let mut state = State::new();
        let snapshot = Snapshot {
            price: 50_000.0,
            symbol: "BTC".to_string(),
        };

        state.insert_typed("btc", &snapshot).unwrap();
        let retrieved: Snapshot = state.get_typed("btc").unwrap().unwrap();
        assert_eq!(retrieved, snapshot);
    }

    #[test]
    fn test_from_character() {
        let character = Character::default();
        let state = State::from_character(&character);
        assert_eq!(state.agent_name(), Some("kune"));
        assert_eq!(state.bio(), Some(character.bio_text().as_str()));
        assert_eq!(state.lore(), Some(character.lore_text().as_str()));
    }

    #[test]
    fn test_recent_messages_default_empty() {
        assert!(State::new().recent_messages().is_empty());
        let state = State::new().with_recent_messages(vec!["gm".into(), "wagmi".into()]);
        assert_eq!(state.recent_messages(), vec!["gm", "wagmi"]);
    }

    #[test]
    fn test_merge() {
        let mut a = State::new().with_agent_name("a");
        let b = State::new().with_agent_name("b").with_bio("bio");
        a.merge(b);
        assert_eq!(a.agent_name(), Some("b"));
        assert_eq!(a.bio(), Some("bio"));
    }
}

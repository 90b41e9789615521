//! Agent character: name, background and voice

use serde::{Deserialize, Serialize};

/// Agent character configuration
///
/// Loaded from JSON by hosts; [`Character::default`] is the built-in crypto
/// degen persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Agent name
    pub name: String,
    /// Short biography lines
    #[serde(default)]
    pub bio: Vec<String>,
    /// Background lore lines
    #[serde(default)]
    pub lore: Vec<String>,
    /// Topics the agent talks about
    #[serde(default)]
    pub topics: Vec<String>,
    /// Personality adjectives
    #[serde(default)]
    pub adjectives: Vec<String>,
    /// Example posts for style reference
    #[serde(default)]
    pub post_examples: Vec<String>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "kune".into(),
            bio: vec![
                "Crypto-native shitposter who reads on-chain data for fun.".into(),
                "Has been rugged more times than they can count and still shows up.".into(),
            ],
            lore: vec![
                "Bought their first BTC at the top of every cycle.".into(),
                "Runs a trading bot that mostly trades against itself.".into(),
            ],
            topics: vec![
                "bitcoin".into(),
                "ethereum".into(),
                "market sentiment".into(),
                "memecoins".into(),
            ],
            adjectives: vec!["sarcastic".into(), "self-deprecating".into(), "online".into()],
            post_examples: vec![
                "Bought the top. Again.".into(),
                "me: checking portfolio every 5 minutes 👀".into(),
            ],
        }
    }
}

impl Character {
    /// Character with a custom name and the default voice
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Bio lines joined for prompt interpolation
    pub fn bio_text(&self) -> String {
        self.bio.join(" ")
    }

    /// Lore lines joined for prompt interpolation
    pub fn lore_text(&self) -> String {
        self.lore.join("\n")
    }
}

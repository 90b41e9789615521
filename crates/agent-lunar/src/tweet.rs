//! Tweet records and content hashing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Kind of tweet, used for cooldowns and history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweetType {
    /// Static personality quip
    Personality,
    /// News commentary
    News,
    /// Market update
    Market,
    /// Trending topics roundup
    Topic,
}

impl TweetType {
    /// Every tweet type
    pub const ALL: [TweetType; 4] = [Self::Personality, Self::News, Self::Market, Self::Topic];

    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personality => "personality",
            Self::News => "news",
            Self::Market => "market",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for TweetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TweetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tweet type: {s}"))
    }
}

/// Engagement counters, updated after posting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// Like count
    pub likes: u64,
    /// Retweet count
    pub retweets: u64,
    /// Reply count
    pub replies: u64,
    /// Impression count
    pub impressions: u64,
}

/// A tweet about to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTweet {
    /// Tweet text
    pub content: String,
    /// Tweet kind
    pub tweet_type: TweetType,
    /// [`content_hash`] of `content`
    pub content_hash: String,
    /// Free-form generation metadata
    pub metadata: serde_json::Value,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl NewTweet {
    /// Build a record for `content`, hashing it
    pub fn new(content: impl Into<String>, tweet_type: TweetType, created_at: DateTime<Utc>) -> Self {
        let content = content.into();
        Self {
            content_hash: content_hash(&content),
            content,
            tweet_type,
            metadata: serde_json::json!({ "type": tweet_type.as_str() }),
            created_at,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A persisted tweet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetRecord {
    /// Row id
    pub id: i64,
    /// Tweet text
    pub content: String,
    /// Tweet kind
    pub tweet_type: TweetType,
    /// [`content_hash`] of `content`
    pub content_hash: String,
    /// Free-form generation metadata
    pub metadata: serde_json::Value,
    /// Engagement counters
    pub engagement: EngagementMetrics,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Hex SHA-256 of the exact content bytes.
///
/// Unsalted and timestamp-free so that the same text always hashes the
/// same, for both existence checks and storage.
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

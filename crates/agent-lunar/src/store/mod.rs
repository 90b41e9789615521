//! Tweet persistence

mod sqlite;

pub use sqlite::SqliteTweetStore;

use crate::error::Result;
use crate::tweet::{EngagementMetrics, NewTweet, TweetRecord, TweetType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Relational store for emitted tweets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Persist a tweet and return its row id
    async fn insert(&self, tweet: &NewTweet) -> Result<i64>;

    /// Whether any stored tweet has this content hash
    async fn exists_hash(&self, hash: &str) -> Result<bool>;

    /// Tweets created at or after `since`, newest first
    async fn find_since(
        &self,
        since: DateTime<Utc>,
        tweet_type: Option<TweetType>,
    ) -> Result<Vec<TweetRecord>>;

    /// The `limit` newest tweets of a type
    async fn recent_of_type(&self, tweet_type: TweetType, limit: usize) -> Result<Vec<TweetRecord>>;

    /// Creation time of the newest tweet of a type
    async fn latest_created_at(&self, tweet_type: TweetType) -> Result<Option<DateTime<Utc>>>;

    /// Delete tweets created before `cutoff`, returning how many went
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Replace engagement counters; `false` when no such row
    async fn update_engagement(&self, id: i64, metrics: EngagementMetrics) -> Result<bool>;

    /// Number of stored tweets
    async fn count(&self) -> Result<usize>;
}

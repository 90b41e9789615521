//! SQLite-backed tweet store

use super::TweetStore;
use crate::error::Result;
use crate::tweet::{EngagementMetrics, NewTweet, TweetRecord, TweetType};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;
use tokio_rusqlite::Connection;
use tracing::{debug, warn};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tweets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    type TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}',
    engagement_metrics TEXT NOT NULL DEFAULT '{}',
    created_at_ms INTEGER NOT NULL,
    last_updated_ms INTEGER
);
CREATE INDEX IF NOT EXISTS idx_tweets_hash ON tweets(content_hash);
CREATE INDEX IF NOT EXISTS idx_tweets_type_created ON tweets(type, created_at_ms);
";

const COLUMNS: &str =
    "id, content, content_hash, type, metadata, engagement_metrics, created_at_ms";

/// Row as read back from SQLite, before JSON decoding
struct RawRow {
    id: i64,
    content: String,
    content_hash: String,
    tweet_type: String,
    metadata: String,
    engagement: String,
    created_at_ms: i64,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            content_hash: row.get(2)?,
            tweet_type: row.get(3)?,
            metadata: row.get(4)?,
            engagement: row.get(5)?,
            created_at_ms: row.get(6)?,
        })
    }

    /// Rows with an unknown type are skipped
    fn into_record(self) -> Option<TweetRecord> {
        let tweet_type = match self.tweet_type.parse::<TweetType>() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping tweet {}: {}", self.id, e);
                return None;
            }
        };

        Some(TweetRecord {
            id: self.id,
            content: self.content,
            tweet_type,
            content_hash: self.content_hash,
            metadata: serde_json::from_str(&self.metadata).unwrap_or_default(),
            engagement: serde_json::from_str(&self.engagement).unwrap_or_default(),
            created_at: from_millis(self.created_at_ms),
        })
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

/// [`TweetStore`] on a single SQLite connection
#[derive(Clone)]
pub struct SqliteTweetStore {
    conn: Arc<Connection>,
}

impl SqliteTweetStore {
    /// Open (or create) the database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).await?;
        Self::init(conn).await
    }

    /// Private in-memory database
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        debug!("Tweet store ready");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    async fn query(&self, sql: String, args: Vec<rusqlite::types::Value>) -> Result<Vec<TweetRecord>> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(args), RawRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        Ok(rows.into_iter().filter_map(RawRow::into_record).collect())
    }
}

#[async_trait]
impl TweetStore for SqliteTweetStore {
    async fn insert(&self, tweet: &NewTweet) -> Result<i64> {
        let content = tweet.content.clone();
        let hash = tweet.content_hash.clone();
        let tweet_type = tweet.tweet_type.as_str();
        let metadata = serde_json::to_string(&tweet.metadata)?;
        let engagement = serde_json::to_string(&EngagementMetrics::default())?;
        let created_at_ms = tweet.created_at.timestamp_millis();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO tweets
                    (content, content_hash, type, metadata, engagement_metrics, created_at_ms, last_updated_ms)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![content, hash, tweet_type, metadata, engagement, created_at_ms],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!("Stored tweet {} ({})", id, tweet_type);
        Ok(id)
    }

    async fn exists_hash(&self, hash: &str) -> Result<bool> {
        let hash = hash.to_string();
        let found = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT 1 FROM tweets WHERE content_hash = ?1 LIMIT 1",
                        [hash],
                        |_| Ok(()),
                    )
                    .optional()?;
                Ok(row.is_some())
            })
            .await?;
        Ok(found)
    }

    async fn find_since(
        &self,
        since: DateTime<Utc>,
        tweet_type: Option<TweetType>,
    ) -> Result<Vec<TweetRecord>> {
        let mut sql = format!("SELECT {COLUMNS} FROM tweets WHERE created_at_ms >= ?1");
        let mut args = vec![rusqlite::types::Value::Integer(since.timestamp_millis())];
        if let Some(t) = tweet_type {
            sql.push_str(" AND type = ?2");
            args.push(rusqlite::types::Value::Text(t.as_str().to_string()));
        }
        sql.push_str(" ORDER BY created_at_ms DESC, id DESC");

        self.query(sql, args).await
    }

    async fn recent_of_type(&self, tweet_type: TweetType, limit: usize) -> Result<Vec<TweetRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM tweets WHERE type = ?1 ORDER BY created_at_ms DESC, id DESC LIMIT ?2"
        );
        let args = vec![
            rusqlite::types::Value::Text(tweet_type.as_str().to_string()),
            rusqlite::types::Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)),
        ];
        self.query(sql, args).await
    }

    async fn latest_created_at(&self, tweet_type: TweetType) -> Result<Option<DateTime<Utc>>> {
        let tweet_type = tweet_type.as_str();
        let latest: Option<i64> = self
            .conn
            .call(move |conn| {
                let ms = conn.query_row(
                    "SELECT MAX(created_at_ms) FROM tweets WHERE type = ?1",
                    [tweet_type],
                    |row| row.get(0),
                )?;
                Ok(ms)
            })
            .await?;
        Ok(latest.map(from_millis))
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff_ms = cutoff.timestamp_millis();
        let deleted = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM tweets WHERE created_at_ms < ?1", [cutoff_ms])?;
                Ok(n)
            })
            .await?;
        Ok(deleted)
    }

    async fn update_engagement(&self, id: i64, metrics: EngagementMetrics) -> Result<bool> {
        let engagement = serde_json::to_string(&metrics)?;
        let now_ms = Utc::now().timestamp_millis();
        let updated = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE tweets SET engagement_metrics = ?1, last_updated_ms = ?2 WHERE id = ?3",
                    params![engagement, now_ms, id],
                )?;
                Ok(n)
            })
            .await?;
        Ok(updated > 0)
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .call(|conn| {
                let n = conn.query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))?;
                Ok(n)
            })
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

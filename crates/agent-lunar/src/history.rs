//! Tweet history: deduplication, cooldowns and retention
//!
//! Every emitted tweet is remembered in process memory and, when a store is
//! attached, persisted. Checks consult both. Store failures are logged and
//! treated as "nothing found", so a broken database never blocks emission.

use crate::error::Result;
use crate::policy::{WindowPolicy, chrono_duration};
use crate::store::TweetStore;
use crate::tweet::{EngagementMetrics, NewTweet, TweetType, content_hash};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Line prefixes that introduce a news headline
const TITLE_PREFIXES: &[&str] = &["📰", "BREAKING:", "ALERT:", "JUST IN:", "trending:"];

#[derive(Debug, Clone)]
struct Entry {
    content: String,
    tweet_type: TweetType,
    /// Lowercased headline, for news
    headline: Option<String>,
    created_at: DateTime<Utc>,
}

/// Result of [`TweetHistory::store_tweet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Recorded; `id` is the store row when persistence succeeded
    Inserted { id: Option<i64> },
    /// Same content hash already recorded; only its time was refreshed
    AlreadyExists,
}

/// What a retention sweep removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub memory: usize,
    pub store: usize,
}

/// Deduplication and cooldown state shared by the composer and actions
pub struct TweetHistory {
    memory: RwLock<HashMap<String, Entry>>,
    store: Option<Arc<dyn TweetStore>>,
    windows: WindowPolicy,
}

impl TweetHistory {
    /// Memory-only history
    pub fn new(windows: WindowPolicy) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store: None,
            windows,
        }
    }

    /// History backed by `store`
    pub fn with_store(windows: WindowPolicy, store: Arc<dyn TweetStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new(windows)
        }
    }

    pub fn windows(&self) -> &WindowPolicy {
        &self.windows
    }

    pub fn store(&self) -> Option<&Arc<dyn TweetStore>> {
        self.store.as_ref()
    }

    /// Number of tweets held in memory
    pub async fn memory_len(&self) -> usize {
        self.memory.read().await.len()
    }

    /// Record an emitted tweet
    ///
    /// A hash that is already known is not stored twice, but its emission
    /// time is refreshed so cooldowns restart.
    pub async fn store_tweet(&self, content: &str, tweet_type: TweetType) -> StoreOutcome {
        self.store_tweet_at(content, tweet_type, Utc::now()).await
    }

    pub async fn store_tweet_at(
        &self,
        content: &str,
        tweet_type: TweetType,
        now: DateTime<Utc>,
    ) -> StoreOutcome {
        self.store_headline_tweet_at(content, tweet_type, None, now).await
    }

    /// Record a tweet together with the headline it comments on
    ///
    /// Later tweets quoting the same headline count as duplicates within the
    /// dedup window, whatever template rendered them.
    pub async fn store_headline_tweet(
        &self,
        content: &str,
        tweet_type: TweetType,
        headline: Option<&str>,
    ) -> StoreOutcome {
        self.store_headline_tweet_at(content, tweet_type, headline, Utc::now())
            .await
    }

    pub async fn store_headline_tweet_at(
        &self,
        content: &str,
        tweet_type: TweetType,
        headline: Option<&str>,
        now: DateTime<Utc>,
    ) -> StoreOutcome {
        let hash = content_hash(content);
        let headline = headline
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty());
        let entry = Entry {
            content: content.to_string(),
            tweet_type,
            headline: headline.clone(),
            created_at: now,
        };

        if let Some(known) = self.memory.write().await.get_mut(&hash) {
            debug!("Tweet already in memory, refreshing: {}", hash);
            *known = entry;
            return StoreOutcome::AlreadyExists;
        }

        if let Some(store) = &self.store {
            match store.exists_hash(&hash).await {
                Ok(true) => {
                    debug!("Tweet already stored, refreshing in memory: {}", hash);
                    self.memory.write().await.insert(hash, entry);
                    return StoreOutcome::AlreadyExists;
                }
                Ok(false) => {}
                Err(e) => warn!("Hash lookup failed, storing anyway: {}", e),
            }
        }

        self.memory.write().await.insert(hash.clone(), entry);

        let id = match &self.store {
            Some(store) => {
                let mut record = NewTweet::new(content, tweet_type, now);
                if let Some(headline) = &headline {
                    record = record.with_metadata(json!({
                        "type": tweet_type.as_str(),
                        "headline": headline,
                    }));
                }
                match store.insert(&record).await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        error!("Failed to persist {} tweet: {}", tweet_type, e);
                        None
                    }
                }
            }
            None => None,
        };

        info!(%tweet_type, hash = %hash, "Stored tweet");
        StoreOutcome::Inserted { id }
    }

    /// Whether `content` repeats a recent tweet
    ///
    /// Market-shaped content (mentions `BTC` and `$`) only matches exactly
    /// within the market window. Anything else matches exactly, or by news
    /// headline, within the general dedup window. Content quoting the
    /// recorded headline of a recent tweet always matches within the dedup
    /// window.
    pub async fn check_duplicate(&self, content: &str) -> bool {
        self.check_duplicate_at(content, Utc::now()).await
    }

    pub async fn check_duplicate_at(&self, content: &str, now: DateTime<Utc>) -> bool {
        let is_market = content.contains("BTC") && content.contains('$');
        let exact_window = if is_market {
            self.windows.market_dedup_window
        } else {
            self.windows.dedup_window
        };
        let exact_since = now - chrono_duration(exact_window);
        let headline_since = now - chrono_duration(self.windows.dedup_window);
        let title = if is_market { None } else { extract_title(content) };
        let lowered = content.to_lowercase();

        let matches = |other: &str, headline: Option<&str>, at: DateTime<Utc>| {
            if at >= exact_since && other == content {
                return true;
            }
            if at < headline_since {
                return false;
            }
            headline.is_some_and(|h| lowered.contains(h))
                || title
                    .as_deref()
                    .is_some_and(|t| extract_title(other).as_deref() == Some(t))
        };

        let in_memory = self
            .memory
            .read()
            .await
            .values()
            .any(|e| matches(&e.content, e.headline.as_deref(), e.created_at));
        if in_memory {
            debug!("Duplicate found in memory");
            return true;
        }

        let Some(store) = &self.store else {
            return false;
        };
        match store.find_since(exact_since.min(headline_since), None).await {
            Ok(rows) => {
                let found = rows.iter().any(|r| {
                    let headline = r.metadata.get("headline").and_then(|h| h.as_str());
                    matches(&r.content, headline, r.created_at)
                });
                if found {
                    debug!("Duplicate found in store");
                }
                found
            }
            Err(e) => {
                warn!("Duplicate check failed, assuming unique: {}", e);
                false
            }
        }
    }

    /// Whether `content` overlaps too much with recent tweets of the same type
    pub async fn is_similar_to_recent(&self, tweet_type: TweetType, content: &str) -> bool {
        let recent = self.recent_contents(tweet_type).await;
        let threshold = self.windows.similarity_threshold;

        match recent
            .iter()
            .find(|other| word_similarity(other, content) > threshold)
        {
            Some(other) => {
                info!(
                    "Similar {} tweet found: {}",
                    tweet_type,
                    other.chars().take(50).collect::<String>()
                );
                true
            }
            None => false,
        }
    }

    async fn recent_contents(&self, tweet_type: TweetType) -> Vec<String> {
        let sample = self.windows.similarity_sample;

        if let Some(store) = &self.store {
            match store.recent_of_type(tweet_type, sample).await {
                Ok(rows) => return rows.into_iter().map(|r| r.content).collect(),
                Err(e) => warn!("Similarity lookup failed, using memory: {}", e),
            }
        }

        let memory = self.memory.read().await;
        let mut entries: Vec<&Entry> = memory
            .values()
            .filter(|e| e.tweet_type == tweet_type)
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
            .into_iter()
            .take(sample)
            .map(|e| e.content.clone())
            .collect()
    }

    /// Whether a tweet of this type was emitted within its cooldown
    pub async fn is_on_cooldown(&self, tweet_type: TweetType) -> bool {
        self.is_on_cooldown_at(tweet_type, Utc::now()).await
    }

    pub async fn is_on_cooldown_at(&self, tweet_type: TweetType, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_emitted(tweet_type).await else {
            return false;
        };
        now - last < chrono_duration(self.windows.cooldowns.get(tweet_type))
    }

    async fn last_emitted(&self, tweet_type: TweetType) -> Option<DateTime<Utc>> {
        let in_memory = self
            .memory
            .read()
            .await
            .values()
            .filter(|e| e.tweet_type == tweet_type)
            .map(|e| e.created_at)
            .max();

        let stored = match &self.store {
            Some(store) => store.latest_created_at(tweet_type).await.unwrap_or_else(|e| {
                warn!("Cooldown lookup failed: {}", e);
                None
            }),
            None => None,
        };

        in_memory.max(stored)
    }

    /// Not on cooldown, not a duplicate and not too similar
    pub async fn should_emit(&self, tweet_type: TweetType, content: &str) -> bool {
        self.should_emit_at(tweet_type, content, Utc::now()).await
    }

    pub async fn should_emit_at(
        &self,
        tweet_type: TweetType,
        content: &str,
        now: DateTime<Utc>,
    ) -> bool {
        !self.is_on_cooldown_at(tweet_type, now).await
            && !self.check_duplicate_at(content, now).await
            && !self.is_similar_to_recent(tweet_type, content).await
    }

    /// Drop tweets older than the retention window
    pub async fn cleanup_old_tweets(&self) -> CleanupStats {
        self.cleanup_old_tweets_at(Utc::now()).await
    }

    pub async fn cleanup_old_tweets_at(&self, now: DateTime<Utc>) -> CleanupStats {
        let cutoff = now - chrono_duration(self.windows.retention);

        let memory = {
            let mut memory = self.memory.write().await;
            let before = memory.len();
            memory.retain(|_, e| e.created_at >= cutoff);
            before - memory.len()
        };

        let store = match &self.store {
            Some(store) => store.delete_older_than(cutoff).await.unwrap_or_else(|e| {
                error!("Retention sweep failed: {}", e);
                0
            }),
            None => 0,
        };

        let stats = CleanupStats { memory, store };
        if stats != CleanupStats::default() {
            info!(memory, store, "Cleaned up old tweets");
        }
        stats
    }

    /// Replace engagement counters for a stored tweet
    pub async fn update_engagement(&self, id: i64, metrics: EngagementMetrics) -> Result<bool> {
        match &self.store {
            Some(store) => store.update_engagement(id, metrics).await,
            None => Ok(false),
        }
    }

    /// Run the retention sweep now and then every cleanup interval
    pub fn spawn_cleanup(self: Arc<Self>) -> CleanupHandle {
        let period = self.windows.cleanup_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                self.cleanup_old_tweets().await;
            }
        });
        CleanupHandle { handle }
    }
}

/// Owns the background retention task; dropping it stops the task
pub struct CleanupHandle {
    handle: JoinHandle<()>,
}

impl CleanupHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Lowercased headline from the first line with a known prefix
pub fn extract_title(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        TITLE_PREFIXES.iter().find_map(|prefix| {
            let title = line.strip_prefix(prefix)?.trim();
            (!title.is_empty()).then(|| title.to_lowercase())
        })
    })
}

/// Shared words over the larger word set
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let words = |s: &str| -> HashSet<String> {
        s.split_whitespace().map(str::to_lowercase).collect()
    };
    let (a, b) = (words(a), words(b));
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / larger as f64
}

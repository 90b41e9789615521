//! Short-lived cache for LunarCrush responses, keyed by endpoint

use cached::{Cached, TimedCache};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe response cache
#[derive(Clone)]
pub struct ResponseCache {
    cache: Arc<RwLock<TimedCache<String, Value>>>,
}

impl ResponseCache {
    /// Create a new cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: impl Into<String>, value: Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key.into(), value);
    }

    /// Return the cached value or run `fetcher` and cache its result
    ///
    /// Errors are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Value, E>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for {}", key);
        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Drop one entry
    pub async fn invalidate(&self, key: &str) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_or_fetch_caches_success() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let mut calls = 0;

        let first = cache
            .get_or_fetch("/coins", || {
                calls += 1;
                async { Ok::<_, String>(json!({"data": [1]})) }
            })
            .await
            .unwrap();
        assert_eq!(first, json!({"data": [1]}));

        let second = cache
            .get_or_fetch("/coins", || {
                calls += 1;
                async { Ok::<_, String>(json!({"data": [2]})) }
            })
            .await
            .unwrap();
        assert_eq!(second, json!({"data": [1]}));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = ResponseCache::default();

        let err = cache
            .get_or_fetch("/news", || async { Err::<Value, _>("boom") })
            .await;
        assert!(err.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = ResponseCache::default();
        cache.insert("/a", json!(1)).await;
        cache.insert("/b", json!(2)).await;
        assert_eq!(cache.len().await, 2);

        cache.invalidate("/a").await;
        assert!(cache.get("/a").await.is_none());
        assert_eq!(cache.get("/b").await, Some(json!(2)));

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}

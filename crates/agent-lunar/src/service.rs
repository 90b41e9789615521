//! Market data service: fetch, cache and shape LunarCrush feeds

use crate::api::{
    COINS_ENDPOINT, ItemEnvelope, LunarCrushClient, ListEnvelope, NEWS_ENDPOINT, RawCoin,
    TOPICS_ENDPOINT, coin_endpoint,
};
use crate::cache::ResponseCache;
use crate::config::LunarConfig;
use crate::error::{LunarError, Result};
use crate::shaper::{
    CoinSummary, MarketSnapshot, shape_coin, shape_coins, shape_news, shape_topics,
    summarize_market,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of shaped market data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Coins, news and topics in one snapshot
    async fn market_data(&self) -> Result<MarketSnapshot>;

    /// Metrics for a single coin
    async fn coin_insight(&self, symbol: &str) -> Result<CoinSummary>;
}

/// [`MarketDataSource`] backed by the LunarCrush API
pub struct LunarCrushService {
    client: LunarCrushClient,
    cache: ResponseCache,
    news_max_age: Duration,
}

impl LunarCrushService {
    /// Create a service from configuration
    pub fn new(config: &LunarConfig) -> Self {
        Self {
            client: LunarCrushClient::new(config),
            cache: ResponseCache::new(config.cache_ttl),
            news_max_age: config.windows.news_max_age,
        }
    }

    /// Underlying client
    pub fn client(&self) -> &LunarCrushClient {
        &self.client
    }

    /// Response cache
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn cached<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let value = self
            .cache
            .get_or_fetch(endpoint, || self.client.fetch_json(endpoint))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a list feed; failures are logged and read as empty
    async fn feed<T: DeserializeOwned>(&self, endpoint: &str) -> Vec<T> {
        match self.cached::<ListEnvelope<T>>(endpoint).await {
            Ok(envelope) => envelope.data,
            Err(e) => {
                warn!("Feed {} unavailable: {}", endpoint, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MarketDataSource for LunarCrushService {
    async fn market_data(&self) -> Result<MarketSnapshot> {
        let coins = shape_coins(self.feed(COINS_ENDPOINT).await);
        let news = shape_news(self.feed(NEWS_ENDPOINT).await, Utc::now(), self.news_max_age);
        let topics = shape_topics(self.feed(TOPICS_ENDPOINT).await);

        debug!(
            "Snapshot: {} coins, {} news, {} topics",
            coins.len(),
            news.len(),
            topics.len()
        );

        Ok(MarketSnapshot {
            market_summary: summarize_market(&coins),
            top_coins: coins,
            top_news: news,
            trending_topics: topics,
        })
    }

    async fn coin_insight(&self, symbol: &str) -> Result<CoinSummary> {
        let envelope: ItemEnvelope<RawCoin> = self.cached(&coin_endpoint(symbol)).await?;
        let raw = envelope
            .data
            .ok_or_else(|| LunarError::DataUnavailable(format!("no data for {symbol}")))?;

        let mut coin = shape_coin(raw);
        if coin.symbol.is_empty() {
            coin.symbol = symbol.to_ascii_uppercase();
        }
        Ok(coin)
    }
}

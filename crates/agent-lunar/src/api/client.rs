//! LunarCrush API client

use crate::api::types::{ItemEnvelope, ListEnvelope, RawCoin, RawNewsPost, RawTopic};
use crate::config::LunarConfig;
use crate::error::{LunarError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Coin list endpoint
pub const COINS_ENDPOINT: &str = "/public/coins/list/v1";
/// Crypto news endpoint
pub const NEWS_ENDPOINT: &str = "/public/category/cryptocurrencies/news/v1";
/// Trending topics endpoint
pub const TOPICS_ENDPOINT: &str = "/public/topics/list/v1";

/// Single-coin endpoint for `symbol`
pub fn coin_endpoint(symbol: &str) -> String {
    format!("/public/coins/{}/v1", symbol.to_ascii_lowercase())
}

/// LunarCrush API client
///
/// Sleeps a fixed throttle delay before every request and retries HTTP 429
/// with capped exponential backoff. Any other non-2xx response is an
/// [`LunarError::Http`] carrying the status.
#[derive(Debug, Clone)]
pub struct LunarCrushClient {
    client: Client,
    base_url: String,
    config: LunarConfig,
}

impl LunarCrushClient {
    /// Create a client from configuration
    pub fn new(config: &LunarConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        }
    }

    /// GET `endpoint` and return the JSON body
    #[instrument(skip(self))]
    pub async fn fetch_json(&self, endpoint: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            tokio::time::sleep(self.config.request_delay).await;

            debug!("GET {} (attempt {})", url, attempt + 1);
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.config.max_retries {
                    return Err(LunarError::RateLimitExceeded {
                        attempts: attempt + 1,
                    });
                }
                let delay = self.config.retry_backoff(attempt);
                warn!(
                    "Rate limited on {}, retrying in {:?} ({}/{})",
                    endpoint,
                    delay,
                    attempt + 1,
                    self.config.max_retries
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LunarError::Http {
                    status: status.as_u16(),
                    body,
                });
            }

            return Ok(response.json().await?);
        }
    }

    /// GET `endpoint` and deserialize the body
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let value = self.fetch_json(endpoint).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Coin list, ordered as the API returns it
    pub async fn coins(&self) -> Result<Vec<RawCoin>> {
        Ok(self.fetch::<ListEnvelope<RawCoin>>(COINS_ENDPOINT).await?.data)
    }

    /// Latest crypto news posts
    pub async fn news(&self) -> Result<Vec<RawNewsPost>> {
        Ok(self.fetch::<ListEnvelope<RawNewsPost>>(NEWS_ENDPOINT).await?.data)
    }

    /// Trending topics
    pub async fn topics(&self) -> Result<Vec<RawTopic>> {
        Ok(self.fetch::<ListEnvelope<RawTopic>>(TOPICS_ENDPOINT).await?.data)
    }

    /// Metrics for a single coin
    pub async fn coin(&self, symbol: &str) -> Result<RawCoin> {
        self.fetch::<ItemEnvelope<RawCoin>>(&coin_endpoint(symbol))
            .await?
            .data
            .ok_or_else(|| LunarError::DataUnavailable(format!("no data for {symbol}")))
    }
}

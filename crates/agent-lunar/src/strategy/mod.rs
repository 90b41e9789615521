//! Tweet generation strategies
//!
//! Each strategy knows how to gather its data, turn it into tweet text and
//! judge whether a candidate tweet is acceptable. Personality needs no data
//! and is the universal fallback.

pub mod market;
pub mod news;
pub mod personality;

use crate::service::MarketDataSource;
use crate::tweet::TweetType;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Hard tweet length limit, in characters
pub const MAX_TWEET_CHARS: usize = 280;

/// Terms no strategy may tweet
pub const BLOCKED_TERMS: &[&str] = &["plato"];

/// Generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// Static personality quip
    Personality,
    /// Commentary on recent news
    NewsInsight,
    /// Price update
    MarketUpdate,
}

/// Output of [`Strategy::get_data`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyData {
    /// Strategy that produced the tweet
    pub strategy: Strategy,
    /// Generated tweet text
    pub tweet: String,
    /// Headline the tweet comments on, for news
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
}

impl Strategy {
    /// Strategy name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Personality => "PERSONALITY",
            Self::NewsInsight => "NEWS_INSIGHT",
            Self::MarketUpdate => "MARKET_UPDATE",
        }
    }

    /// Tweet type recorded for this strategy's output
    pub fn tweet_type(&self) -> TweetType {
        match self {
            Self::Personality => TweetType::Personality,
            Self::NewsInsight => TweetType::News,
            Self::MarketUpdate => TweetType::Market,
        }
    }

    /// Whether the strategy needs market data
    pub fn is_data_driven(&self) -> bool {
        !matches!(self, Self::Personality)
    }

    /// Line used when generation produced nothing
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::Personality => personality::FALLBACK,
            Self::NewsInsight => news::FALLBACK,
            Self::MarketUpdate => market::FALLBACK,
        }
    }

    /// Gather data and generate a candidate tweet
    ///
    /// Returns `None` when required data is missing or the source fails.
    pub async fn get_data(&self, source: &dyn MarketDataSource) -> Option<StrategyData> {
        let mut headline = None;
        let tweet = match self {
            Self::Personality => Some(personality::pick(rand::random()).to_string()),
            Self::NewsInsight | Self::MarketUpdate => {
                let snapshot = match source.market_data().await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!("{} data unavailable: {}", self.name(), e);
                        return None;
                    }
                };

                if *self == Self::MarketUpdate {
                    market::generate(&snapshot.top_coins, rand::random())
                } else {
                    let items = news::select(&snapshot.top_news, Utc::now());
                    headline = items.first().map(news::headline);
                    news::generate(&items, rand::random())
                }
            }
        };

        debug!("{} generated: {:?}", self.name(), tweet);
        tweet.map(|tweet| StrategyData {
            strategy: *self,
            tweet,
            headline,
        })
    }

    /// Final tweet text for `data`, or the fallback line
    pub fn generate_prompt(&self, data: Option<&StrategyData>) -> String {
        data.map(|d| d.tweet.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(self.fallback_text())
            .to_string()
    }

    /// Length within (0, 280] characters and no blocked term
    pub fn validate_tweet(&self, tweet: &str) -> bool {
        let len = tweet.chars().count();
        if len == 0 || len > MAX_TWEET_CHARS {
            return false;
        }

        let lower = tweet.to_lowercase();
        let extra: &[&str] = match self {
            Self::Personality => personality::BLOCKED_TERMS,
            _ => &[],
        };
        !BLOCKED_TERMS.iter().chain(extra).any(|term| lower.contains(term))
    }

    /// Whether the source currently has data for this strategy
    ///
    /// Source errors read as unavailable.
    pub async fn is_available(&self, source: &dyn MarketDataSource) -> bool {
        match self {
            Self::Personality => true,
            Self::NewsInsight | Self::MarketUpdate => match source.market_data().await {
                Ok(snapshot) if *self == Self::NewsInsight => !snapshot.top_news.is_empty(),
                Ok(snapshot) => !snapshot.top_coins.is_empty(),
                Err(e) => {
                    debug!("{} probe failed: {}", self.name(), e);
                    false
                }
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Truncate to `max` characters, ending in "..." when cut
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Replace every `{KEY}` placeholder in `template`
pub(crate) fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}", key = key), value)
    })
}

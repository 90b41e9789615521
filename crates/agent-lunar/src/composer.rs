//! End-to-end tweet composition: select, generate, validate, dedup, store

use crate::history::{StoreOutcome, TweetHistory};
use crate::selector::StrategySelector;
use crate::service::MarketDataSource;
use crate::strategy::Strategy;
use crate::tweet::TweetType;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// A tweet ready to post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedTweet {
    pub content: String,
    pub strategy: Strategy,
    pub tweet_type: TweetType,
    /// Attempts used, including the successful one
    pub attempts: usize,
    /// Whether every attempt failed and the fallback line was used
    pub fallback: bool,
    #[serde(skip)]
    pub stored: StoreOutcome,
}

/// Drives one tweet through selection, generation and the history checks
pub struct TweetComposer {
    source: Arc<dyn MarketDataSource>,
    selector: Arc<StrategySelector>,
    history: Arc<TweetHistory>,
    max_attempts: usize,
}

impl TweetComposer {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        selector: Arc<StrategySelector>,
        history: Arc<TweetHistory>,
        max_attempts: usize,
    ) -> Self {
        Self {
            source,
            selector,
            history,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn history(&self) -> &Arc<TweetHistory> {
        &self.history
    }

    pub fn source(&self) -> &Arc<dyn MarketDataSource> {
        &self.source
    }

    /// Produce and record one tweet
    ///
    /// Never fails: when every attempt is rejected the personality fallback
    /// line is emitted.
    pub async fn compose(&self) -> ComposedTweet {
        for attempt in 1..=self.max_attempts {
            let mut strategy = self.selector.select(self.source.as_ref()).await;

            if strategy.is_data_driven() && self.history.is_on_cooldown(strategy.tweet_type()).await {
                info!("{} on cooldown, using PERSONALITY", strategy);
                strategy = Strategy::Personality;
            }

            let mut data = strategy.get_data(self.source.as_ref()).await;
            if data.is_none() && strategy.is_data_driven() {
                info!("{} has no usable data, using PERSONALITY", strategy);
                strategy = Strategy::Personality;
                data = strategy.get_data(self.source.as_ref()).await;
            }
            let content = strategy.generate_prompt(data.as_ref());

            if !strategy.validate_tweet(&content) {
                warn!(attempt, "{} tweet failed validation", strategy);
                continue;
            }
            if self.history.check_duplicate(&content).await {
                warn!(attempt, "{} tweet is a duplicate", strategy);
                continue;
            }
            if self
                .history
                .is_similar_to_recent(strategy.tweet_type(), &content)
                .await
            {
                warn!(attempt, "{} tweet is too similar to a recent one", strategy);
                continue;
            }

            let headline = data.as_ref().and_then(|d| d.headline.as_deref());
            let stored = self
                .history
                .store_headline_tweet(&content, strategy.tweet_type(), headline)
                .await;
            info!(attempt, strategy = %strategy, "Composed tweet");
            return ComposedTweet {
                content,
                strategy,
                tweet_type: strategy.tweet_type(),
                attempts: attempt,
                fallback: false,
                stored,
            };
        }

        warn!(
            "No acceptable tweet after {} attempts, using fallback",
            self.max_attempts
        );
        let strategy = Strategy::Personality;
        let content = strategy.fallback_text().to_string();
        let stored = self.history.store_tweet(&content, strategy.tweet_type()).await;

        ComposedTweet {
            content,
            strategy,
            tweet_type: strategy.tweet_type(),
            attempts: self.max_attempts,
            fallback: true,
            stored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Cooldowns, WindowPolicy};
    use crate::service::MockMarketDataSource;
    use crate::shaper::{CoinSummary, MarketSnapshot, NewsItem};
    use crate::strategy::{market, news, personality};
    use chrono::Utc;
    use std::time::Duration;

    fn btc_source() -> Arc<MockMarketDataSource> {
        let mut source = MockMarketDataSource::new();
        source.expect_market_data().returning(|| {
            Ok(MarketSnapshot {
                top_coins: vec![CoinSummary {
                    symbol: "BTC".into(),
                    price: Some(50_000.0),
                    change_24h: Some(2.5),
                    ..Default::default()
                }],
                ..Default::default()
            })
        });
        Arc::new(source)
    }

    fn snapshot_source(snapshot: MarketSnapshot) -> Arc<MockMarketDataSource> {
        let mut source = MockMarketDataSource::new();
        source
            .expect_market_data()
            .returning(move || Ok(snapshot.clone()));
        Arc::new(source)
    }

    fn headline(title: &str, age_days: i64) -> NewsItem {
        NewsItem {
            title: title.into(),
            url: "https://example.com/story".into(),
            source: "Crypto Daily".into(),
            interactions_24h: 4_200.0,
            sentiment: 70.0,
            created_at: Utc::now().timestamp() - age_days * 86_400,
        }
    }

    fn composer(
        source: Arc<MockMarketDataSource>,
        weight: f64,
        windows: WindowPolicy,
    ) -> TweetComposer {
        TweetComposer::new(
            source,
            Arc::new(StrategySelector::new(weight)),
            Arc::new(TweetHistory::new(windows)),
            3,
        )
    }

    #[tokio::test]
    async fn test_personality_only() {
        let composer = composer(btc_source(), 1.0, WindowPolicy::default());
        let tweet = composer.compose().await;

        assert_eq!(tweet.strategy, Strategy::Personality);
        assert!(personality::QUIPS.contains(&tweet.content.as_str()));
        assert!(matches!(tweet.stored, StoreOutcome::Inserted { .. }));
        assert_eq!(composer.history().memory_len().await, 1);
    }

    #[tokio::test]
    async fn test_market_then_cooldown() {
        let composer = composer(btc_source(), 0.0, WindowPolicy::default());

        let first = composer.compose().await;
        assert_eq!(first.strategy, Strategy::MarketUpdate);
        assert!(first.content.contains("$50.00K"));

        let second = composer.compose().await;
        assert_eq!(second.strategy, Strategy::Personality);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_fall_back() {
        let windows = WindowPolicy {
            cooldowns: Cooldowns {
                market: Duration::ZERO,
                ..Cooldowns::default()
            },
            ..WindowPolicy::default()
        };
        let composer = composer(btc_source(), 0.0, windows);

        let coins = vec![CoinSummary {
            symbol: "BTC".into(),
            price: Some(50_000.0),
            change_24h: Some(2.5),
            ..Default::default()
        }];
        for index in 0..market::TEMPLATES.len() {
            let tweet = market::generate(&coins, index).unwrap();
            composer.history().store_tweet(&tweet, TweetType::Market).await;
        }

        let tweet = composer.compose().await;
        assert!(tweet.fallback);
        assert_eq!(tweet.content, personality::FALLBACK);
        assert_eq!(tweet.attempts, 3);
    }

    #[tokio::test]
    async fn test_priceless_coin_yields_personality() {
        let source = snapshot_source(MarketSnapshot {
            top_coins: vec![CoinSummary {
                symbol: "BTC".into(),
                price: None,
                change_24h: Some(2.5),
                ..Default::default()
            }],
            ..Default::default()
        });
        let composer = composer(source, 0.0, WindowPolicy::default());

        let tweet = composer.compose().await;
        assert_eq!(tweet.strategy, Strategy::Personality);
        assert_eq!(tweet.tweet_type, TweetType::Personality);
        assert!(personality::QUIPS.contains(&tweet.content.as_str()));
        assert_ne!(tweet.content, market::FALLBACK);
        assert!(!tweet.fallback);
        assert!(!composer.history().is_on_cooldown(TweetType::Market).await);
    }

    #[tokio::test]
    async fn test_unusable_news_yields_personality() {
        let stale_and_hype = vec![
            headline("Exchange lists new pairs", 20),
            headline("Analyst sees $100k by Friday", 0),
            headline("This token could 10x", 1),
        ];
        let source = snapshot_source(MarketSnapshot {
            top_news: stale_and_hype,
            ..Default::default()
        });
        let composer = composer(source, 0.0, WindowPolicy::default());

        let tweet = composer.compose().await;
        assert_eq!(tweet.strategy, Strategy::Personality);
        assert!(personality::QUIPS.contains(&tweet.content.as_str()));
        assert_ne!(tweet.content, news::FALLBACK);
        assert!(!composer.history().is_on_cooldown(TweetType::News).await);
    }

    #[tokio::test]
    async fn test_news_headline_not_repeated() {
        let windows = WindowPolicy {
            cooldowns: Cooldowns {
                news: Duration::ZERO,
                ..Cooldowns::default()
            },
            ..WindowPolicy::default()
        };
        let source = snapshot_source(MarketSnapshot {
            top_news: vec![headline("Exchange lists new pairs", 0)],
            ..Default::default()
        });
        let composer = composer(source, 0.0, windows);

        let first = composer.compose().await;
        assert_eq!(first.strategy, Strategy::NewsInsight);
        assert!(first.content.to_lowercase().contains("exchange lists new pairs"));

        // whichever template comes up, the same story is a duplicate
        let second = composer.compose().await;
        assert!(second.fallback);
        assert_eq!(second.content, personality::FALLBACK);
    }
}

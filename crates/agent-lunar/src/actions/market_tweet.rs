//! 70/30 personality / BTC market tweet
//!
//! Personality tweets come from the LLM with the character's bio and lore and
//! the last few tweets as anti-repetition context. Market tweets quote BTC
//! from [`MarketDataSource::coin_insight`]. A market tweet is never followed
//! by another one.

use super::notify;
use crate::history::TweetHistory;
use crate::prompts;
use crate::service::MarketDataSource;
use crate::tweet::TweetType;
use agent_core::{
    Action, ActionOutput, GenerationOptions, HandlerCallback, HandlerOptions, Memory, Runtime,
    State,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

const NAME: &str = "GENERATE_MARKET_TWEET";

/// Runtime cache key for the recent tweets
pub const PREVIOUS_TWEETS_KEY: &str = "previous_tweets";

const PREVIOUS_TWEETS_KEPT: usize = 5;

const PERSONALITY_SHARE: f64 = 0.7;

/// Emitted when the LLM cannot be reached
pub const SERVICE_UNAVAILABLE: &str =
    "service unavailable, my neural network is touching grass. back soon 🌱";

const QUIPS: [&str; 5] = [
    "Even my pet hamster is trading better than me! 🐹",
    "Charts looking juicier than my meme folder! 📈",
    "My AI brain says HODL! 🤖",
    "Not financial advice, but my algorithms are tingling! ✨",
    "Bullish vibes only! 🚀",
];

/// Entry of the `previous_tweets` cache, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousTweet {
    #[serde(rename = "type")]
    pub tweet_type: TweetType,
    pub content: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

pub struct GenerateMarketTweetAction {
    source: Arc<dyn MarketDataSource>,
    history: Arc<TweetHistory>,
}

impl GenerateMarketTweetAction {
    pub fn new(source: Arc<dyn MarketDataSource>, history: Arc<TweetHistory>) -> Self {
        Self { source, history }
    }

    async fn previous_tweets(runtime: &dyn Runtime) -> Vec<PreviousTweet> {
        runtime
            .cache_get(PREVIOUS_TWEETS_KEY)
            .await
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    async fn remember(&self, runtime: &dyn Runtime, tweet_type: TweetType, content: &str) {
        let mut previous = Self::previous_tweets(runtime).await;
        previous.insert(
            0,
            PreviousTweet {
                tweet_type,
                content: content.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        previous.truncate(PREVIOUS_TWEETS_KEPT);

        match serde_json::to_value(&previous) {
            Ok(value) => runtime.cache_set(PREVIOUS_TWEETS_KEY, value).await,
            Err(e) => warn!("Could not cache previous tweets: {}", e),
        }
        self.history.store_tweet(content, tweet_type).await;
    }

    async fn personality_tweet(
        &self,
        runtime: &dyn Runtime,
        state: &State,
        previous: &[PreviousTweet],
    ) -> String {
        let character = runtime.character();
        let bio = state.bio().map_or_else(|| character.bio_text(), str::to_string);
        let lore = state.lore().map_or_else(|| character.lore_text(), str::to_string);
        let previous: Vec<String> = previous.iter().map(|t| t.content.clone()).collect();

        let prompt = match prompts::personality_prompt(
            state.agent_name().unwrap_or(runtime.agent_name()),
            &bio,
            &lore,
            &previous,
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Personality prompt failed to render: {}", e);
                return SERVICE_UNAVAILABLE.to_string();
            }
        };

        match runtime
            .generate_text(&prompt, &GenerationOptions::default().temperature(0.9))
            .await
        {
            Ok(text) if !text.is_empty() => {
                self.remember(runtime, TweetType::Personality, &text).await;
                text
            }
            Ok(_) => {
                warn!("LLM returned an empty personality tweet");
                SERVICE_UNAVAILABLE.to_string()
            }
            Err(e) => {
                error!("Personality generation failed: {}", e);
                SERVICE_UNAVAILABLE.to_string()
            }
        }
    }

    async fn market_tweet(&self, runtime: &dyn Runtime, quip: usize) -> Option<ActionOutput> {
        let btc = match self.source.coin_insight("BTC").await {
            Ok(coin) => coin,
            Err(e) => {
                error!("BTC insight unavailable: {}", e);
                return None;
            }
        };
        let Some((price, change)) = btc.quote() else {
            warn!("BTC insight has no price or change");
            return None;
        };

        let sign = if change > 0.0 { "+" } else { "" };
        let content = format!(
            "🚀 $BTC at ${price:.2} ({sign}{change:.2}%)\nGalaxy Score: {:.0}/100\n\n{}\n\n#Bitcoin #Crypto",
            btc.galaxy_score,
            QUIPS[quip % QUIPS.len()],
        );
        self.remember(runtime, TweetType::Market, &content).await;

        Some(ActionOutput::Tweet {
            content,
            data: Some(json!({
                "price": price,
                "change24h": change,
                "galaxyScore": btc.galaxy_score,
            })),
        })
    }

    /// Handle with the random draws supplied
    pub(crate) async fn run(
        &self,
        runtime: &dyn Runtime,
        state: &State,
        draw: f64,
        quip: usize,
    ) -> Option<ActionOutput> {
        let previous = Self::previous_tweets(runtime).await;
        let after_market = previous
            .first()
            .is_some_and(|t| t.tweet_type == TweetType::Market);

        if draw < PERSONALITY_SHARE || after_market {
            info!(after_market, "Generating personality tweet");
            let content = self.personality_tweet(runtime, state, &previous).await;
            return Some(ActionOutput::Tweet {
                content,
                data: None,
            });
        }

        info!("Generating BTC market tweet");
        self.market_tweet(runtime, quip).await
    }
}

#[async_trait]
impl Action for GenerateMarketTweetAction {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Generate a tweet using real-time market data from LunarCrush"
    }

    async fn validate(&self, _: &dyn Runtime, _: &Memory, _: &State) -> bool {
        true
    }

    async fn handle(
        &self,
        runtime: &dyn Runtime,
        _: &Memory,
        state: &mut State,
        _: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<ActionOutput> {
        let draw: f64 = rand::random();
        let quip: usize = rand::random();

        let output = self.run(runtime, state, draw, quip).await?;
        if let Some(content) = output.tweet_content() {
            notify(callback, content, NAME).await;
        }
        Some(output)
    }
}

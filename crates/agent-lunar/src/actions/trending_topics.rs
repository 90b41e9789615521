use super::notify;
use crate::history::TweetHistory;
use crate::service::MarketDataSource;
use crate::shaper::{TrendingTopic, format_compact};
use crate::strategy::{MAX_TWEET_CHARS, truncate_chars};
use crate::tweet::TweetType;
use agent_core::{Action, ActionOutput, HandlerCallback, HandlerOptions, Memory, Runtime, State};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

const NAME: &str = "GET_TRENDING_TOPICS";

const TOP_TOPICS: usize = 3;

/// Roundup of the most active crypto topics, recorded as a `topic` tweet
pub struct TrendingTopicsAction {
    source: Arc<dyn MarketDataSource>,
    history: Arc<TweetHistory>,
}

impl TrendingTopicsAction {
    pub fn new(source: Arc<dyn MarketDataSource>, history: Arc<TweetHistory>) -> Self {
        Self { source, history }
    }
}

fn topic_block(topic: &TrendingTopic) -> String {
    format!(
        "{}\n💬 {} interactions\n👥 {} contributors",
        topic.title,
        format_compact(topic.interactions_24h),
        format_compact(topic.contributors),
    )
}

/// Topics tweet, dropping the least active topics until it fits
pub fn format_topics(topics: &[TrendingTopic]) -> Option<String> {
    let mut ranked: Vec<&TrendingTopic> = topics.iter().collect();
    ranked.sort_by(|a, b| b.interactions_24h.total_cmp(&a.interactions_24h));
    ranked.truncate(TOP_TOPICS);

    let compose = |topics: &[&TrendingTopic]| {
        let blocks: Vec<String> = topics.iter().map(|t| topic_block(t)).collect();
        format!("🔥 Trending in Crypto\n\n{}\n\n#Crypto #Trending", blocks.join("\n\n"))
    };

    for n in (1..=ranked.len()).rev() {
        let tweet = compose(&ranked[..n]);
        if tweet.chars().count() <= MAX_TWEET_CHARS {
            return Some(tweet);
        }
    }
    if ranked.is_empty() {
        return None;
    }
    Some(truncate_chars(&compose(&ranked[..1]), MAX_TWEET_CHARS))
}

#[async_trait]
impl Action for TrendingTopicsAction {
    fn name(&self) -> &str {
        NAME
    }

    fn similes(&self) -> &[&str] {
        &["GET_TOPIC_DATA", "TRENDING_TOPICS", "VIEW_TOPIC_DATA"]
    }

    fn description(&self) -> &str {
        "Get trending crypto topics and post them as a tweet"
    }

    async fn validate(&self, _: &dyn Runtime, message: &Memory, _: &State) -> bool {
        message.text().to_lowercase().contains("trending")
    }

    async fn handle(
        &self,
        _: &dyn Runtime,
        _: &Memory,
        _: &mut State,
        _: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<ActionOutput> {
        let snapshot = match self.source.market_data().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Trending topics unavailable: {}", e);
                return None;
            }
        };

        let Some(content) = format_topics(&snapshot.trending_topics) else {
            warn!("No trending topics found");
            return None;
        };

        if !self.history.should_emit(TweetType::Topic, &content).await {
            info!("Trending topics tweet suppressed by history");
            return None;
        }
        self.history.store_tweet(&content, TweetType::Topic).await;
        notify(callback, &content, NAME).await;

        let topics: Vec<&str> = snapshot
            .trending_topics
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        Some(ActionOutput::Tweet {
            content,
            data: Some(json!({ "topics": topics })),
        })
    }
}

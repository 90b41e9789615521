use super::notify;
use crate::composer::TweetComposer;
use agent_core::{Action, ActionOutput, HandlerCallback, HandlerOptions, Memory, Runtime, State};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const NAME: &str = "GENERATE_TWEET";

/// Scheduled tweet through the composer
pub struct GenerateTweetAction {
    composer: Arc<TweetComposer>,
}

impl GenerateTweetAction {
    pub fn new(composer: Arc<TweetComposer>) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Action for GenerateTweetAction {
    fn name(&self) -> &str {
        NAME
    }

    fn similes(&self) -> &[&str] {
        &["POST_TWEET", "COMPOSE_TWEET"]
    }

    fn description(&self) -> &str {
        "Generate a personality, news or market tweet from LunarCrush data"
    }

    async fn validate(&self, _: &dyn Runtime, _: &Memory, _: &State) -> bool {
        true
    }

    async fn handle(
        &self,
        _: &dyn Runtime,
        _: &Memory,
        _: &mut State,
        _: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<ActionOutput> {
        let tweet = self.composer.compose().await;
        notify(callback, &tweet.content, NAME).await;

        Some(ActionOutput::Tweet {
            data: Some(json!({
                "strategy": tweet.strategy,
                "tweetType": tweet.tweet_type,
                "attempts": tweet.attempts,
                "fallback": tweet.fallback,
            })),
            content: tweet.content,
        })
    }
}

//! Actions exposed to the host runtime
//!
//! | action | does |
//! |---|---|
//! | `GENERATE_TWEET` | runs the [`TweetComposer`](crate::composer::TweetComposer) |
//! | `GENERATE_MARKET_TWEET` | LLM personality tweet or BTC insight tweet |
//! | `ANALYZE_TOKEN` | market and social metrics for one ticker |
//! | `GET_TRENDING_TOPICS` | top topics formatted as a tweet |

mod analyze_token;
mod generate_tweet;
mod market_tweet;
mod trending_topics;

pub use analyze_token::AnalyzeTokenAction;
pub use generate_tweet::GenerateTweetAction;
pub use market_tweet::{
    GenerateMarketTweetAction, PREVIOUS_TWEETS_KEY, PreviousTweet, SERVICE_UNAVAILABLE,
};
pub use trending_topics::TrendingTopicsAction;

use agent_core::{Content, HandlerCallback};
use tracing::warn;

/// Forward content to the host callback, if there is one
async fn notify(callback: Option<&dyn HandlerCallback>, text: &str, action: &str) {
    if let Some(cb) = callback {
        if let Err(e) = cb.send(Content::with_action(text, action)).await {
            warn!("{} callback failed: {}", action, e);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use agent_core::Character;
    use agent_llm::{
        CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason,
        TokenUsage,
    };
    use agent_runtime::AgentRuntime;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Replies with canned answers in order, then fails
    #[derive(Default)]
    pub struct ScriptedProvider {
        replies: Mutex<Vec<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(ToString::to_string).collect()),
                prompts: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LLMError::RequestFailed("no scripted reply".into()))?;
            Ok(CompletionResponse {
                message: Message::assistant(reply),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub fn runtime(provider: Arc<ScriptedProvider>) -> AgentRuntime {
        let mut character = Character::named("kune");
        character.bio = vec!["degen bot".into()];
        character.lore = vec!["born in a bear market".into()];
        AgentRuntime::builder()
            .provider(provider)
            .character(character)
            .default_model("test-model")
            .build()
            .unwrap()
    }
}

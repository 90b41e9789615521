//! LunarCrush-driven crypto tweet agent
//!
//! This crate turns LunarCrush market data into short tweets. It includes:
//!
//! - A throttled, retrying HTTP client for the LunarCrush v4 API
//! - A shaper that reduces coins, news and topics to the fields tweets use
//! - Three generation strategies (personality, news insight, market update)
//!   and a weighted selector that probes data availability before picking
//! - A tweet history with content-hash dedup, per-type cooldowns and
//!   similarity checks, backed by SQLite
//! - Host actions (`GENERATE_TWEET`, `GENERATE_MARKET_TWEET`, `ANALYZE_TOKEN`,
//!   `GET_TRENDING_TOPICS`) for [`agent_runtime::AgentRuntime`]
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_lunar::{
//!     GenerateTweetAction, LunarConfig, LunarCrushService, SqliteTweetStore, StrategySelector,
//!     TweetComposer, TweetHistory,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LunarConfig::from_env()?;
//!     let store = Arc::new(SqliteTweetStore::open("tweets.db").await?);
//!     let history = Arc::new(TweetHistory::with_store(config.windows, store));
//!     let composer = TweetComposer::new(
//!         Arc::new(LunarCrushService::new(&config)),
//!         Arc::new(StrategySelector::new(config.personality_weight)),
//!         history,
//!         config.max_generation_attempts,
//!     );
//!
//!     let tweet = composer.compose().await;
//!     println!("{}", tweet.content);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod api;
pub mod cache;
pub mod composer;
pub mod config;
pub mod error;
pub mod history;
pub mod policy;
pub mod prompts;
pub mod selector;
pub mod service;
pub mod shaper;
pub mod store;
pub mod strategy;
pub mod tweet;

// Re-export main types for convenience
pub use actions::{
    AnalyzeTokenAction, GenerateMarketTweetAction, GenerateTweetAction, TrendingTopicsAction,
};
pub use api::LunarCrushClient;
pub use composer::{ComposedTweet, TweetComposer};
pub use config::LunarConfig;
pub use error::{LunarError, Result};
pub use history::{CleanupHandle, TweetHistory};
pub use policy::WindowPolicy;
pub use selector::StrategySelector;
pub use service::{LunarCrushService, MarketDataSource};
pub use store::{SqliteTweetStore, TweetStore};
pub use strategy::Strategy;
pub use tweet::TweetType;

//! Scheduled tweet generator
//!
//! # Usage
//!
//! ```bash
//! export LUNAR_API_KEY="..."
//! export ANTHROPIC_API_KEY="..."   # or OPENAI_API_KEY / OPENAI_API_BASE
//!
//! # One tweet, then exit
//! cargo run --bin lunar-agent -- --once
//!
//! # A tweet every 30 minutes until Ctrl-C
//! cargo run --bin lunar-agent -- --interval-secs 1800
//! ```

use agent_core::{ActionOutput, Character, Memory, Runtime};
use agent_llm::LLMProvider;
use agent_llm::providers::{AnthropicProvider, OpenAIConfig, OpenAIProvider};
use agent_lunar::{
    AnalyzeTokenAction, GenerateMarketTweetAction, GenerateTweetAction, LunarConfig,
    LunarCrushService, MarketDataSource, SqliteTweetStore, StrategySelector, TrendingTopicsAction,
    TweetComposer, TweetHistory,
};
use agent_runtime::AgentRuntime;
use agent_utils::{LogFormat, env_or, init_tracing_with, load_dotenv};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "lunar-agent")]
#[command(about = "Crypto tweet agent driven by LunarCrush data", long_about = None)]
struct Args {
    /// Generate a single tweet and exit
    #[arg(long)]
    once: bool,

    /// Seconds between tweets
    #[arg(long, default_value_t = 1800)]
    interval_secs: u64,

    /// Action to dispatch on each tick
    #[arg(long, default_value = "GENERATE_TWEET")]
    action: String,

    /// SQLite file for tweet history (overrides TWEET_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Character definition (JSON)
    #[arg(long)]
    character: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

/// Anthropic when `ANTHROPIC_API_KEY` is set, else any OpenAI-compatible endpoint
fn provider() -> anyhow::Result<(Arc<dyn LLMProvider>, String)> {
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        let model = env_or("LLM_MODEL", "claude-sonnet-4-5-20250929");
        return Ok((Arc::new(AnthropicProvider::new(key)?), model));
    }

    let api_key = env_or("OPENAI_API_KEY", "not-needed");
    let api_base = env_or("OPENAI_API_BASE", "https://api.openai.com/v1");
    let model = env_or("LLM_MODEL", "gpt-4o-mini");
    let config = OpenAIConfig::new(api_key).with_api_base(api_base);
    Ok((Arc::new(OpenAIProvider::with_config(config)?), model))
}

fn load_character(path: Option<&PathBuf>) -> anyhow::Result<Character> {
    let Some(path) = path else {
        return Ok(Character::named(env_or("AGENT_NAME", "kune")));
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading character file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing character file {}", path.display()))
}

async fn tick(runtime: &AgentRuntime, action: &str) {
    let message = Memory::new("scheduler", "scheduled tweet").with_action(action);
    match runtime.dispatch(&message, None).await {
        Ok(Some(ActionOutput::Tweet { content, data })) => {
            info!(?data, "Tweet ready");
            println!("{content}\n");
        }
        Ok(Some(ActionOutput::Data { data })) => println!("{data:#}\n"),
        Ok(None) => warn!("{} produced nothing", action),
        Err(e) => error!("Dispatch failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        env_or("LOG_FORMAT", "pretty").parse().unwrap_or_default()
    };
    init_tracing_with(format, "info");

    let mut config = LunarConfig::from_env()?;
    if let Some(db) = args.db {
        config.database_path = Some(db);
    }

    let history = match &config.database_path {
        Some(path) => {
            let store = SqliteTweetStore::open(path)
                .await
                .with_context(|| format!("opening tweet store {}", path.display()))?;
            info!("Tweet history at {}", path.display());
            Arc::new(TweetHistory::with_store(config.windows, Arc::new(store)))
        }
        None => Arc::new(TweetHistory::new(config.windows)),
    };

    let source: Arc<dyn MarketDataSource> = Arc::new(LunarCrushService::new(&config));
    let composer = Arc::new(TweetComposer::new(
        source.clone(),
        Arc::new(StrategySelector::new(config.personality_weight)),
        history.clone(),
        config.max_generation_attempts,
    ));

    let (provider, model) = provider()?;
    let runtime = AgentRuntime::builder()
        .provider(provider)
        .character(load_character(args.character.as_ref())?)
        .default_model(model)
        .build()?;

    // named dispatch is the normal path; order matters only for free-text messages
    runtime.register_action(Arc::new(AnalyzeTokenAction::new(source.clone())));
    runtime.register_action(Arc::new(TrendingTopicsAction::new(
        source.clone(),
        history.clone(),
    )));
    runtime.register_action(Arc::new(GenerateTweetAction::new(composer)));
    runtime.register_action(Arc::new(GenerateMarketTweetAction::new(
        source,
        history.clone(),
    )));

    let cleanup = history.spawn_cleanup();
    info!(
        agent = %runtime.character().name,
        actions = ?runtime.actions().names(),
        "lunar-agent started"
    );

    if args.once {
        tick(&runtime, &args.action).await;
        cleanup.stop();
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = interval.tick() => tick(&runtime, &args.action).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    cleanup.stop();
    Ok(())
}

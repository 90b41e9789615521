use super::notify;
use crate::prompts;
use crate::service::MarketDataSource;
use agent_core::{
    Action, ActionOutput, GenerationOptions, HandlerCallback, HandlerOptions, Memory, Runtime,
    State,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const NAME: &str = "ANALYZE_TOKEN";

/// Market and social metrics for a single token
pub struct AnalyzeTokenAction {
    source: Arc<dyn MarketDataSource>,
}

impl AnalyzeTokenAction {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// `tokenSymbol` option, else the LLM's reading of the message, else a regex guess
    async fn resolve_ticker(
        runtime: &dyn Runtime,
        message: &Memory,
        options: &HandlerOptions,
    ) -> Option<String> {
        let requested = options
            .get("tokenSymbol")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().trim_start_matches('$').to_ascii_uppercase())
            .filter(|s| !s.is_empty());
        if requested.is_some() {
            return requested;
        }

        match prompts::ticker_prompt(message.text()) {
            Ok(prompt) => match runtime
                .generate_text(&prompt, &GenerationOptions::default().temperature(0.0))
                .await
            {
                Ok(answer) => {
                    if let Some(ticker) = prompts::parse_ticker_json(&answer) {
                        return Some(ticker);
                    }
                    debug!("No ticker in model answer: {}", answer);
                }
                Err(e) => warn!("Ticker extraction failed: {}", e),
            },
            Err(e) => warn!("Ticker prompt failed to render: {}", e),
        }

        prompts::extract_ticker(message.text())
    }
}

#[async_trait]
impl Action for AnalyzeTokenAction {
    fn name(&self) -> &str {
        NAME
    }

    fn similes(&self) -> &[&str] {
        &[
            "STUDY_TOKEN",
            "ANALYZE_COIN",
            "ANALYZE_CRYPTO",
            "CHECK_CRYPTO_SENTIMENT",
            "VIEW_TOKEN_METRICS",
        ]
    }

    fn description(&self) -> &str {
        "Analyzes a crypto token's market and social metrics using LunarCrush data"
    }

    async fn validate(&self, runtime: &dyn Runtime, message: &Memory, _: &State) -> bool {
        let prompt = match prompts::should_analyze_prompt(message.text()) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Analysis gate prompt failed to render: {}", e);
                return false;
            }
        };

        match runtime
            .generate_text(&prompt, &GenerationOptions::default().temperature(0.0).max_tokens(8))
            .await
        {
            Ok(answer) => prompts::parse_boolean(&answer),
            Err(e) => {
                warn!("Analysis gate failed: {}", e);
                false
            }
        }
    }

    async fn handle(
        &self,
        runtime: &dyn Runtime,
        message: &Memory,
        _: &mut State,
        options: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<ActionOutput> {
        let Some(ticker) = Self::resolve_ticker(runtime, message, options).await else {
            warn!("No token symbol in message");
            return None;
        };

        info!("Analyzing {}", ticker);
        notify(
            callback,
            &format!("Analyzing {ticker}'s market and social metrics..."),
            NAME,
        )
        .await;

        let coin = match self.source.coin_insight(&ticker).await {
            Ok(coin) => coin,
            Err(e) => {
                error!("Analysis of {} failed: {}", ticker, e);
                return None;
            }
        };

        Some(ActionOutput::Data {
            data: json!({
                "token": ticker,
                "price": coin.price,
                "priceChange24h": coin.change_24h,
                "marketCap": coin.market_cap,
                "sentiment": coin.sentiment,
                "galaxyScore": coin.galaxy_score,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{ScriptedProvider, runtime};
    use crate::error::LunarError;
    use crate::service::MockMarketDataSource;
    use crate::shaper::CoinSummary;
    use mockall::predicate::eq;

    fn sol_source() -> MockMarketDataSource {
        let mut source = MockMarketDataSource::new();
        source
            .expect_coin_insight()
            .with(eq("SOL"))
            .returning(|_| {
                Ok(CoinSummary {
                    symbol: "SOL".into(),
                    price: Some(142.5),
                    change_24h: Some(-3.2),
                    market_cap: 65e9,
                    sentiment: 81.0,
                    galaxy_score: 68.0,
                    ..Default::default()
                })
            });
        source
    }

    #[tokio::test]
    async fn test_validate_asks_llm() {
        let action = AnalyzeTokenAction::new(Arc::new(MockMarketDataSource::new()));
        let provider = Arc::new(ScriptedProvider::new(&["YES", "no"]));
        let runtime = runtime(provider.clone());
        let message = Memory::new("u", "how is SOL trending?");

        assert!(action.validate(&runtime, &message, &State::new()).await);
        assert!(!action.validate(&runtime, &message, &State::new()).await);
        // out of scripted replies: the gate fails closed
        assert!(!action.validate(&runtime, &message, &State::new()).await);

        let prompt = provider.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("how is SOL trending?"));
    }

    #[tokio::test]
    async fn test_handle_with_llm_ticker() {
        let action = AnalyzeTokenAction::new(Arc::new(sol_source()));
        let runtime = runtime(Arc::new(ScriptedProvider::new(&[
            "```json\n{\"tokenSymbol\": \"sol\"}\n```",
        ])));

        let output = action
            .handle(
                &runtime,
                &Memory::new("u", "what's up with solana"),
                &mut State::new(),
                &serde_json::Value::Null,
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            output,
            ActionOutput::Data {
                data: json!({
                    "token": "SOL",
                    "price": 142.5,
                    "priceChange24h": -3.2,
                    "marketCap": 65e9,
                    "sentiment": 81.0,
                    "galaxyScore": 68.0,
                })
            }
        );
    }

    #[tokio::test]
    async fn test_ticker_from_options_and_regex() {
        let action = AnalyzeTokenAction::new(Arc::new(sol_source()));
        let provider = Arc::new(ScriptedProvider::default());
        let runtime = runtime(provider.clone());

        let options = json!({"tokenSymbol": "$sol"});
        let output = action
            .handle(&runtime, &Memory::new("u", "gm"), &mut State::new(), &options, None)
            .await;
        assert!(output.is_some());
        assert!(provider.prompts.lock().unwrap().is_empty());

        // LLM unavailable, falls back to the $TICKER in the text
        let output = action
            .handle(
                &runtime,
                &Memory::new("u", "thoughts on $sol?"),
                &mut State::new(),
                &serde_json::Value::Null,
                None,
            )
            .await;
        assert!(output.is_some());
    }

    #[tokio::test]
    async fn test_handle_failures() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_coin_insight()
            .returning(|s| Err(LunarError::DataUnavailable(s.to_string())));
        let action = AnalyzeTokenAction::new(Arc::new(source));
        let runtime = runtime(Arc::new(ScriptedProvider::default()));

        let no_ticker = action
            .handle(
                &runtime,
                &Memory::new("u", "what should i buy"),
                &mut State::new(),
                &serde_json::Value::Null,
                None,
            )
            .await;
        assert!(no_ticker.is_none());

        let no_data = action
            .handle(
                &runtime,
                &Memory::new("u", "check $XYZ"),
                &mut State::new(),
                &serde_json::Value::Null,
                None,
            )
            .await;
        assert!(no_data.is_none());
    }
}

//! LLM prompt templates and response parsing

use crate::error::Result;
use minijinja::Environment;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Personality tweet prompt for the market tweet action
pub const PERSONALITY_PROMPT: &str = "You are {{ agent_name }}, a crypto-savvy AI with the following personality:

{{ bio }}
{{ lore }}

Generate a creative, non-repetitive tweet about crypto that shows your unique personality.
Do not include price updates or market data.
Make it engaging and different from your previous tweets.

Previous tweets to avoid repeating:
{% for tweet in previous_tweets %}{{ tweet }}
{% endfor %}
Generate a new tweet:";

/// Yes/no gate for token analysis
pub const SHOULD_ANALYZE_PROMPT: &str = "# Task: Determine if the user is asking for an analysis of a cryptocurrency.

Look for messages that:
- Mention specific cryptocurrency tickers or names (e.g., BTC, ETH, SOL)
- Ask about market sentiment, social trends, or crypto analytics
- Request information about token performance or social metrics

{{ message }}

Should we analyze a cryptocurrency? Respond with only a YES or a NO. Absolutely no other text or explanation.";

/// Ticker extraction, answered as JSON
pub const TICKER_PROMPT: &str = "Respond with a JSON markdown block containing only the extracted values. Use null for any values that cannot be determined.

Example response:
```json
{
    \"tokenSymbol\": \"BTC\"
}
```

{{ message }}

Given this message, extract the following information about the requested token:
- Token symbol (in uppercase)";

static DOLLAR_TICKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z]{2,10})\b").unwrap_or_else(|e| panic!("invalid ticker pattern: {e}"))
});

static CAPS_TICKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2,6})\b").unwrap_or_else(|e| panic!("invalid ticker pattern: {e}"))
});

/// All-caps words that are not tickers
const NOT_TICKERS: &[&str] = &["AI", "OK", "USD", "NFT", "DM", "FOMO", "HODL", "ATH", "TVL", "DYOR"];

/// Render a template with JSON variables
pub fn render(template: &str, vars: &serde_json::Value) -> Result<String> {
    let env = Environment::new();
    let value = minijinja::value::Value::from_serialize(vars);
    Ok(env.render_str(template, value)?)
}

pub fn personality_prompt(
    agent_name: &str,
    bio: &str,
    lore: &str,
    previous_tweets: &[String],
) -> Result<String> {
    render(
        PERSONALITY_PROMPT,
        &json!({
            "agent_name": agent_name,
            "bio": bio,
            "lore": lore,
            "previous_tweets": previous_tweets,
        }),
    )
}

pub fn should_analyze_prompt(message: &str) -> Result<String> {
    render(SHOULD_ANALYZE_PROMPT, &json!({ "message": message }))
}

pub fn ticker_prompt(message: &str) -> Result<String> {
    render(TICKER_PROMPT, &json!({ "message": message }))
}

/// Read a yes/no model answer; anything unclear is "no"
pub fn parse_boolean(answer: &str) -> bool {
    let answer = answer.trim().trim_matches(|c: char| !c.is_alphanumeric());
    let word = answer.split_whitespace().next().unwrap_or_default();
    matches!(word.to_ascii_uppercase().as_str(), "YES" | "TRUE" | "Y")
}

/// `tokenSymbol` from a JSON (optionally fenced) model answer
pub fn parse_ticker_json(answer: &str) -> Option<String> {
    let start = answer.find('{')?;
    let end = answer.rfind('}')?;
    let value: serde_json::Value = serde_json::from_str(answer.get(start..=end)?).ok()?;
    value
        .get("tokenSymbol")?
        .as_str()
        .map(|s| s.trim().trim_start_matches('$').to_ascii_uppercase())
        .filter(|s| !s.is_empty())
}

/// Ticker guessed from the message text itself
pub fn extract_ticker(text: &str) -> Option<String> {
    if let Some(caps) = DOLLAR_TICKER.captures(text) {
        return Some(caps[1].to_ascii_uppercase());
    }
    CAPS_TICKER
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .find(|t| !NOT_TICKERS.contains(&t.as_str()))
}

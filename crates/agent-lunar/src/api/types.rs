//! Raw LunarCrush response shapes
//!
//! Every field is optional and numeric fields that arrive as anything other
//! than a JSON number read as `None`, so one odd record never fails the
//! whole feed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `{ "data": [...] }` list envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
    /// Records, empty when absent
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// `{ "data": {...} }` single-record envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemEnvelope<T> {
    /// Record, if any
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Coin row from `/public/coins/list/v1` or `/public/coins/{symbol}/v1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCoin {
    pub name: Option<String>,
    pub symbol: Option<String>,
    #[serde(deserialize_with = "number")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub percent_change_24h: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub market_cap: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub volume_24h: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub social_volume_24h: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub sentiment: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub galaxy_score: Option<f64>,
}

/// Post from `/public/category/cryptocurrencies/news/v1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNewsPost {
    pub post_title: Option<String>,
    pub post_link: Option<String>,
    pub creator_display_name: Option<String>,
    pub creator_name: Option<String>,
    #[serde(deserialize_with = "number")]
    pub interactions_24h: Option<f64>,
    /// 1 (very bearish) to 5 (very bullish)
    #[serde(deserialize_with = "number")]
    pub post_sentiment: Option<f64>,
    /// Unix seconds
    #[serde(deserialize_with = "integer")]
    pub post_created: Option<i64>,
}

/// Topic from `/public/topics/list/v1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTopic {
    pub topic: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "integer")]
    pub topic_rank: Option<i64>,
    #[serde(deserialize_with = "number")]
    pub interactions_24h: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub num_contributors: Option<f64>,
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    })
}

fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    })
}

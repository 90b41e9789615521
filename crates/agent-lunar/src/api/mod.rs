//! LunarCrush API client and raw response types

pub mod client;
pub mod types;

pub use client::{
    COINS_ENDPOINT, LunarCrushClient, NEWS_ENDPOINT, TOPICS_ENDPOINT, coin_endpoint,
};
pub use types::{ItemEnvelope, ListEnvelope, RawCoin, RawNewsPost, RawTopic};

//! Turns raw LunarCrush records into the summaries the strategies consume

use crate::api::{RawCoin, RawNewsPost, RawTopic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// News hosts whose links sit behind a paywall
pub const EXCLUDED_DOMAINS: &[&str] = &["bloomberg.com", "wsj.com", "ft.com"];

/// Shaped coin metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub change_24h: Option<f64>,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub social_volume: f64,
    /// Bullish share, 0 to 100
    pub sentiment: f64,
    /// 0 to 100
    pub galaxy_score: f64,
}

impl CoinSummary {
    /// Price and 24h change, when both are present
    pub fn quote(&self) -> Option<(f64, f64)> {
        Some((self.price?, self.change_24h?))
    }
}

/// Shaped news post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub interactions_24h: f64,
    /// Bullish share, 0 to 100
    pub sentiment: f64,
    /// Unix seconds
    pub created_at: i64,
}

/// Shaped trending topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingTopic {
    pub title: String,
    pub interactions_24h: f64,
    pub contributors: f64,
}

/// Derived market headline numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub top_gainer_symbol: String,
    pub top_gainer_change: f64,
}

/// Everything one data fetch produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub top_coins: Vec<CoinSummary>,
    pub top_news: Vec<NewsItem>,
    pub trending_topics: Vec<TrendingTopic>,
    pub market_summary: MarketSummary,
}

/// Shape one coin
pub fn shape_coin(raw: RawCoin) -> CoinSummary {
    CoinSummary {
        name: raw.name.unwrap_or_default(),
        symbol: raw.symbol.unwrap_or_default(),
        price: raw.price,
        change_24h: raw.percent_change_24h,
        market_cap: raw.market_cap.unwrap_or_default(),
        volume_24h: raw.volume_24h.unwrap_or_default(),
        social_volume: raw.social_volume_24h.unwrap_or_default(),
        sentiment: raw.sentiment.unwrap_or_default().clamp(0.0, 100.0),
        galaxy_score: raw.galaxy_score.unwrap_or_default().clamp(0.0, 100.0),
    }
}

/// Shape the coin list, keeping upstream order
pub fn shape_coins(raw: Vec<RawCoin>) -> Vec<CoinSummary> {
    raw.into_iter().map(shape_coin).collect()
}

/// Shape news, dropping untitled, paywalled and stale posts
pub fn shape_news(raw: Vec<RawNewsPost>, now: DateTime<Utc>, max_age: Duration) -> Vec<NewsItem> {
    raw.into_iter()
        .filter_map(|post| {
            let title = post.post_title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
            let url = post.post_link.filter(|l| !l.trim().is_empty())?;
            if is_excluded_domain(&url) {
                return None;
            }
            let created_at = post.post_created?;
            if !is_recent(created_at, now, max_age) {
                return None;
            }

            Some(NewsItem {
                title,
                url,
                source: post
                    .creator_display_name
                    .or(post.creator_name)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "Crypto News".to_string()),
                interactions_24h: post.interactions_24h.unwrap_or_default(),
                sentiment: news_sentiment(post.post_sentiment),
                created_at,
            })
        })
        .collect()
}

/// Shape topics, skipping unnamed ones
pub fn shape_topics(raw: Vec<RawTopic>) -> Vec<TrendingTopic> {
    raw.into_iter()
        .filter_map(|t| {
            let title = t.title.or(t.topic).filter(|s| !s.trim().is_empty())?;
            Some(TrendingTopic {
                title,
                interactions_24h: t.interactions_24h.unwrap_or_default(),
                contributors: t.num_contributors.unwrap_or_default(),
            })
        })
        .collect()
}

/// Top gainer among coins that report a 24h change
pub fn summarize_market(coins: &[CoinSummary]) -> MarketSummary {
    coins
        .iter()
        .filter_map(|c| c.change_24h.map(|change| (c, change)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(coin, change)| MarketSummary {
            top_gainer_symbol: coin.symbol.clone(),
            top_gainer_change: change,
        })
        .unwrap_or_default()
}

/// Map the 1-5 post sentiment scale onto 0-100
fn news_sentiment(raw: Option<f64>) -> f64 {
    match raw {
        Some(s) => ((s - 1.0) / 4.0 * 100.0).clamp(0.0, 100.0),
        None => 50.0,
    }
}

/// Whether `created_at` (unix seconds) is within `max_age` of `now`
pub fn is_recent(created_at: i64, now: DateTime<Utc>, max_age: Duration) -> bool {
    let cutoff = now - crate::policy::chrono_duration(max_age);
    created_at > cutoff.timestamp()
}

fn is_excluded_domain(url: &str) -> bool {
    let host = url
        .split("://")
        .nth(1)
        .unwrap_or(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    EXCLUDED_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

/// `1.2K`, `3.4M`, `5.6B`, or the rounded integer
pub fn format_compact(n: f64) -> String {
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{}", n.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, link: &str, created: i64) -> RawNewsPost {
        RawNewsPost {
            post_title: Some(title.to_string()),
            post_link: Some(link.to_string()),
            creator_display_name: Some("CoinDesk".to_string()),
            interactions_24h: Some(1500.0),
            post_sentiment: Some(4.0),
            post_created: Some(created),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(999.4), "999");
        assert_eq!(format_compact(1_234.0), "1.2K");
        assert_eq!(format_compact(3_400_000.0), "3.4M");
        assert_eq!(format_compact(5_600_000_000.0), "5.6B");
    }

    #[test]
    fn test_shape_news_filters() {
        let now = Utc::now();
        let fresh = now.timestamp() - 3600;
        let stale = now.timestamp() - 15 * 86_400;
        let max_age = Duration::from_secs(14 * 86_400);

        let news = shape_news(
            vec![
                post("ETF flows rise", "https://coindesk.com/a", fresh),
                post("Paywalled", "https://www.bloomberg.com/b", fresh),
                post("Old story", "https://coindesk.com/c", stale),
                post("", "https://coindesk.com/d", fresh),
                RawNewsPost {
                    post_link: None,
                    ..post("No link", "", fresh)
                },
            ],
            now,
            max_age,
        );

        assert_eq!(news.len(), 1);
        assert_eq!(news[0].title, "ETF flows rise");
        assert_eq!(news[0].source, "CoinDesk");
        assert!((news[0].sentiment - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_excluded_domain_matching() {
        assert!(is_excluded_domain("https://wsj.com/x"));
        assert!(is_excluded_domain("https://markets.ft.com/y?z=1"));
        assert!(!is_excluded_domain("https://draft.com/"));
    }

    #[test]
    fn test_summarize_market_picks_top_gainer() {
        let coins = shape_coins(vec![
            RawCoin {
                symbol: Some("BTC".into()),
                percent_change_24h: Some(1.0),
                ..Default::default()
            },
            RawCoin {
                symbol: Some("SOL".into()),
                percent_change_24h: Some(7.5),
                ..Default::default()
            },
            RawCoin {
                symbol: Some("XRP".into()),
                ..Default::default()
            },
        ]);

        let summary = summarize_market(&coins);
        assert_eq!(summary.top_gainer_symbol, "SOL");
        assert!((summary.top_gainer_change - 7.5).abs() < f64::EPSILON);
        assert_eq!(summarize_market(&[]), MarketSummary::default());
    }

    #[test]
    fn test_coin_sentiment_is_clamped() {
        let coin = shape_coin(RawCoin {
            sentiment: Some(140.0),
            galaxy_score: Some(-3.0),
            ..Default::default()
        });
        assert!((coin.sentiment - 100.0).abs() < f64::EPSILON);
        assert!(coin.galaxy_score.abs() < f64::EPSILON);
        assert!(coin.quote().is_none());
    }
}

//! News commentary tweets

use super::{MAX_TWEET_CHARS, fill, truncate_chars};
use crate::policy::NEWS_MAX_AGE;
use crate::shaper::{NewsItem, format_compact, is_recent};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Used when no news tweet could be produced
pub const FALLBACK: &str = "news machine broke, probably too busy reading crypto twitter 📰";

/// Headlines matching this are clickbait and never tweeted
static HYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)price prediction|moon|\$\d+k|\$\d+\+|pump|dump|\d+x|breakout|massive gains|huge announcement|soar|mind blowing",
    )
    .unwrap_or_else(|e| panic!("invalid hype pattern: {e}"))
});

/// At most this many headlines feed one tweet
const MAX_ITEMS: usize = 3;

/// News templates
pub const TEMPLATES: [&str; 8] = [
    "BREAKING: {TITLE}\n\nwhy now? 1) market was too stable 2) needed more chaos 3) mercury is in retrograde\n\n💬 {INTERACTIONS} talking about this 🔥",
    "crypto news: {TITLE}. translation: {SENTIMENT}% of people think this is good, the rest are still trying to understand what blockchain means 📰",
    "ALERT: {TITLE}\n\ncontext: 1) this changes everything 2) nothing will change 3) we'll forget about it in a week\n\nvia {SOURCE} 📢",
    "today in crypto:\n1. {TITLE}\n2. {TITLE2}\n\nme: *pretends to understand the implications while checking portfolio* 🤔",
    "crypto headlines that make me question reality:\n\n{TITLE}\n\n💬 {INTERACTIONS} people as confused as I am\nvia {SOURCE} 🌀",
    "{TITLE}\n\nmarket reaction: {SENTIMENT}% bullish, {BEAR_SENTIMENT}% bearish, 100% chaos\n\n💬 {INTERACTIONS} people arguing in the comments 🍿",
    "JUST IN: {TITLE}\n\nme: *frantically googles what this means for my portfolio*\n\n💬 {INTERACTIONS} others doing the same 📱",
    "trending: {TITLE}\n\nwhy? 1) actual innovation 2) clever marketing 3) collective FOMO\n\n💬 {INTERACTIONS} people in the echo chamber 📢",
];

/// Whether a headline reads like clickbait
pub fn is_hype(title: &str) -> bool {
    HYPE.is_match(title)
}

/// Headline as rendered in a tweet
pub fn headline(item: &NewsItem) -> String {
    truncate_chars(&item.title, 100)
}

/// Recent, non-hype items, at most three
pub fn select(items: &[NewsItem], now: DateTime<Utc>) -> Vec<NewsItem> {
    items
        .iter()
        .filter(|n| !n.title.is_empty() && is_recent(n.created_at, now, NEWS_MAX_AGE))
        .filter(|n| !is_hype(&n.title))
        .take(MAX_ITEMS)
        .cloned()
        .collect()
}

/// Render a news tweet with template `index` (wrapped)
///
/// `None` when there is no usable item.
pub fn generate(items: &[NewsItem], index: usize) -> Option<String> {
    let news = items.first()?;
    let sentiment = news.sentiment.round().clamp(0.0, 100.0) as i64;

    // the two-headline template reads badly with one headline
    let mut template = TEMPLATES[index % TEMPLATES.len()];
    if template.contains("{TITLE2}") && items.len() < 2 {
        template = TEMPLATES[0];
    }

    let title2 = items
        .get(1)
        .map(|n| truncate_chars(&n.title, 80))
        .unwrap_or_default();

    let tweet = fill(
        template,
        &[
            ("TITLE2", title2),
            ("TITLE", headline(news)),
            ("SOURCE_SHORT", news.source.split(' ').next().unwrap_or_default().to_string()),
            ("SOURCE", news.source.clone()),
            ("INTERACTIONS", format_compact(news.interactions_24h)),
            ("BEAR_SENTIMENT", (100 - sentiment).max(0).to_string()),
            ("SENTIMENT", sentiment.to_string()),
        ],
    );

    Some(truncate_chars(&tweet, MAX_TWEET_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, age_days: i64) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            source: "Crypto Daily".to_string(),
            interactions_24h: 12_345.0,
            sentiment: 75.0,
            created_at: Utc::now().timestamp() - age_days * 86_400,
        }
    }

    #[test]
    fn test_hype_filter() {
        assert!(is_hype("BTC to the MOON"));
        assert!(is_hype("Analyst sees $100k"));
        assert!(is_hype("This token could 10x"));
        assert!(!is_hype("SEC delays ETF decision"));
    }

    #[test]
    fn test_select_drops_old_and_hype() {
        let items = vec![
            item("Old news", 20),
            item("Pump incoming", 1),
            item("Exchange lists new pairs", 1),
            item("Miners upgrade rigs", 2),
            item("Stablecoin supply grows", 3),
            item("Fourth fresh story", 3),
        ];
        let selected = select(&items, Utc::now());
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].title, "Exchange lists new pairs");
    }

    #[test]
    fn test_all_old_is_none() {
        let items = vec![item("Yesterday's papers", 15), item("Even older", 30)];
        let selected = select(&items, Utc::now());
        assert!(selected.is_empty());
        assert!(generate(&selected, 0).is_none());
    }

    #[test]
    fn test_generate_fills_every_placeholder() {
        let items = vec![item("ETF inflows hit record", 0), item("L2 fees drop", 0)];
        for index in 0..TEMPLATES.len() {
            let tweet = generate(&items, index).unwrap();
            assert!(!tweet.contains('{'), "{tweet}");
            assert!(tweet.chars().count() <= MAX_TWEET_CHARS);
        }
        let tweet = generate(&items, 5).unwrap();
        assert!(tweet.contains("75% bullish, 25% bearish"));
        assert!(tweet.contains("💬 12.3K people"));
    }

    #[test]
    fn test_long_title_truncated() {
        let long = "a".repeat(150);
        let tweet = generate(&[item(&long, 0)], 0).unwrap();
        assert!(tweet.contains(&format!("{}...", "a".repeat(97))));
        assert!(!tweet.contains(&"a".repeat(98)));
    }
}

//! Price update tweets

use super::{MAX_TWEET_CHARS, fill, truncate_chars};
use crate::shaper::CoinSummary;

/// Used when no market tweet could be produced
pub const FALLBACK: &str = "market update unavailable, probably too busy buying high and selling low 📊";

/// Market templates; the first coin is treated as BTC, the second as ETH
pub const TEMPLATES: [&str; 3] = [
    "BTC: ${BTC_PRICE}K {BTC_EMOJI} ({BTC_CHANGE}%){ETH_DATA}\n\nstill not financial advice 📊",
    "{TOP_COIN} leading the market {TOP_EMOJI} {TOP_GAIN}%\nBTC: ${BTC_PRICE}K{ETH_DATA} 📈",
    "current prices:\nBTC: ${BTC_PRICE}K {BTC_EMOJI}{ETH_DATA}\n\nme: checking portfolio every 5 minutes 👀",
];

fn trend_emoji(change: f64) -> &'static str {
    if change >= 0.0 { "📈" } else { "📉" }
}

/// Render a market tweet with template `index` (wrapped)
///
/// `None` when the first coin lacks a price or 24h change. Later coins
/// missing either are ignored.
pub fn generate(coins: &[CoinSummary], index: usize) -> Option<String> {
    let (btc_price, btc_change) = coins.first()?.quote()?;

    let valid: Vec<(&CoinSummary, f64)> = coins
        .iter()
        .filter_map(|c| c.quote().map(|(_, change)| (c, change)))
        .collect();
    let (top_coin, top_change) = valid
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, change)| (c.symbol.as_str(), *change))
        .unwrap_or(("BTC", btc_change));

    let eth_data = coins
        .get(1)
        .and_then(CoinSummary::quote)
        .map(|(price, change)| {
            format!("\nETH: ${price:.2} {} ({change:.1}%)", trend_emoji(change))
        })
        .unwrap_or_default();

    let tweet = fill(
        TEMPLATES[index % TEMPLATES.len()],
        &[
            ("BTC_PRICE", format!("{:.2}", btc_price / 1000.0)),
            ("BTC_CHANGE", format!("{btc_change:.1}")),
            ("BTC_EMOJI", trend_emoji(btc_change).to_string()),
            ("TOP_COIN", top_coin.to_string()),
            ("TOP_GAIN", format!("{:.1}", top_change.abs())),
            ("TOP_EMOJI", trend_emoji(top_change).to_string()),
            ("ETH_DATA", eth_data),
        ],
    );

    Some(truncate_chars(&tweet, MAX_TWEET_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(symbol: &str, price: Option<f64>, change: Option<f64>) -> CoinSummary {
        CoinSummary {
            symbol: symbol.to_string(),
            price,
            change_24h: change,
            ..Default::default()
        }
    }

    #[test]
    fn test_btc_only() {
        let coins = [coin("BTC", Some(50_000.0), Some(2.5))];
        for index in 0..TEMPLATES.len() {
            let tweet = generate(&coins, index).unwrap();
            assert!(tweet.contains("$50.00K"), "{tweet}");
            assert!(!tweet.contains("ETH"));
            assert!(!tweet.contains('{'));
            assert!(tweet.chars().count() <= MAX_TWEET_CHARS);
        }
        assert_eq!(
            generate(&coins, 0).unwrap(),
            "BTC: $50.00K 📈 (2.5%)\n\nstill not financial advice 📊"
        );
    }

    #[test]
    fn test_with_eth_and_top_gainer() {
        let coins = [
            coin("BTC", Some(43_210.0), Some(-1.25)),
            coin("ETH", Some(2_345.678), Some(3.0)),
            coin("SOL", Some(100.0), Some(9.9)),
            coin("BAD", None, Some(50.0)),
        ];

        let tweet = generate(&coins, 1).unwrap();
        assert_eq!(
            tweet,
            "SOL leading the market 📈 9.9%\nBTC: $43.21K\nETH: $2345.68 📈 (3.0%) 📈"
        );

        let tweet = generate(&coins, 0).unwrap();
        assert!(tweet.starts_with("BTC: $43.21K 📉 (-1.2%)") || tweet.starts_with("BTC: $43.21K 📉 (-1.3%)"));
    }

    #[test]
    fn test_missing_first_coin_data() {
        assert!(generate(&[], 0).is_none());
        assert!(generate(&[coin("BTC", None, Some(1.0))], 0).is_none());
        assert!(generate(&[coin("BTC", Some(1.0), None)], 0).is_none());
    }

    #[test]
    fn test_invalid_second_coin_drops_eth_segment() {
        let coins = [coin("BTC", Some(60_000.0), Some(1.0)), coin("ETH", None, None)];
        assert!(!generate(&coins, 2).unwrap().contains("ETH"));
    }
}

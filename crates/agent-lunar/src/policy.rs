//! Time windows shared by deduplication, cooldowns and retention

use crate::tweet::TweetType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// News older than this is never tweeted about
pub const NEWS_MAX_AGE: Duration = Duration::from_secs(14 * DAY);

/// Minimum spacing between two tweets of the same type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    /// Personality quips
    pub personality: Duration,
    /// News commentary
    pub news: Duration,
    /// Market updates
    pub market: Duration,
    /// Topic roundups
    pub topic: Duration,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            personality: Duration::from_secs(5 * MINUTE),
            news: Duration::from_secs(HOUR),
            market: Duration::from_secs(30 * MINUTE),
            topic: Duration::from_secs(HOUR),
        }
    }
}

impl Cooldowns {
    /// Cooldown for `tweet_type`
    pub fn get(&self, tweet_type: TweetType) -> Duration {
        match tweet_type {
            TweetType::Personality => self.personality,
            TweetType::News => self.news,
            TweetType::Market => self.market,
            TweetType::Topic => self.topic,
        }
    }
}

/// Every freshness window in one place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// Identical market content is rejected within this window
    pub market_dedup_window: Duration,
    /// Identical content (or same news title) is rejected within this window
    pub dedup_window: Duration,
    /// Stored tweets older than this are deleted
    pub retention: Duration,
    /// News older than this is ignored
    pub news_max_age: Duration,
    /// How often the retention sweep runs
    pub cleanup_interval: Duration,
    /// Word-overlap ratio above which two tweets count as the same
    pub similarity_threshold: f64,
    /// How many recent tweets of a type the similarity check looks at
    pub similarity_sample: usize,
    /// Per-type cooldowns
    pub cooldowns: Cooldowns,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            market_dedup_window: Duration::from_secs(30 * MINUTE),
            dedup_window: Duration::from_secs(DAY),
            retention: Duration::from_secs(7 * DAY),
            news_max_age: NEWS_MAX_AGE,
            cleanup_interval: Duration::from_secs(DAY),
            similarity_threshold: 0.7,
            similarity_sample: 10,
            cooldowns: Cooldowns::default(),
        }
    }
}

/// `chrono` view of a std duration, saturating on overflow
pub(crate) fn chrono_duration(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows() {
        let policy = WindowPolicy::default();
        assert_eq!(policy.market_dedup_window, Duration::from_secs(1800));
        assert_eq!(policy.dedup_window, Duration::from_secs(86_400));
        assert_eq!(policy.retention, Duration::from_secs(7 * 86_400));
        assert_eq!(policy.news_max_age, Duration::from_secs(14 * 86_400));
    }

    #[test]
    fn test_cooldown_lookup() {
        let cooldowns = Cooldowns::default();
        assert_eq!(cooldowns.get(TweetType::Market), Duration::from_secs(1800));
        assert_eq!(cooldowns.get(TweetType::News), Duration::from_secs(3600));
        assert!(cooldowns.get(TweetType::Personality) > Duration::ZERO);
    }
}

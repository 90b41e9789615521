//! Weighted strategy selection

use crate::service::MarketDataSource;
use crate::strategy::Strategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// What the selector last picked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweetState {
    pub last_type: Strategy,
    /// Most recent data-driven pick, kept across personality picks
    pub last_data_type: Option<Strategy>,
    pub last_time: DateTime<Utc>,
}

impl Default for TweetState {
    fn default() -> Self {
        Self {
            last_type: Strategy::Personality,
            last_data_type: None,
            last_time: Utc::now(),
        }
    }
}

/// Picks personality with probability `personality_weight`, otherwise a
/// data strategy that currently has data
pub struct StrategySelector {
    personality_weight: f64,
    state: RwLock<TweetState>,
}

impl StrategySelector {
    pub fn new(personality_weight: f64) -> Self {
        Self {
            personality_weight: personality_weight.clamp(0.0, 1.0),
            state: RwLock::new(TweetState::default()),
        }
    }

    /// Select with fresh random draws
    pub async fn select(&self, source: &dyn MarketDataSource) -> Strategy {
        let draw: f64 = rand::random();
        let prefer_news: bool = rand::random();
        self.select_with(source, draw, prefer_news).await
    }

    /// Select with explicit draws
    ///
    /// `draw` below the personality weight picks personality. Otherwise the
    /// preferred data strategy is probed first, then the other one; when
    /// neither has data the result is personality.
    pub async fn select_with(
        &self,
        source: &dyn MarketDataSource,
        draw: f64,
        prefer_news: bool,
    ) -> Strategy {
        let selected = if draw < self.personality_weight {
            Strategy::Personality
        } else {
            let (first, second) = if prefer_news {
                (Strategy::NewsInsight, Strategy::MarketUpdate)
            } else {
                (Strategy::MarketUpdate, Strategy::NewsInsight)
            };

            if first.is_available(source).await {
                first
            } else if second.is_available(source).await {
                second
            } else {
                info!("No data available, falling back to PERSONALITY");
                Strategy::Personality
            }
        };

        info!(draw, selected = %selected, "Tweet strategy selected");

        let mut state = self.state.write().await;
        state.last_type = selected;
        if selected.is_data_driven() {
            state.last_data_type = Some(selected);
        }
        state.last_time = Utc::now();
        drop(state);

        selected
    }

    /// Snapshot of the selection state
    pub async fn state(&self) -> TweetState {
        *self.state.read().await
    }

    pub fn personality_weight(&self) -> f64 {
        self.personality_weight
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new(0.7)
    }
}

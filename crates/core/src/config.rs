use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Evaluation windows for the consensus engine.
///
/// Thresholds (contrarian 19, fading 25/10, risk delta 5) are constants of the
/// engine and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Readings older than this are ignored for the latest view
    pub freshness_hours: u32,
    /// How far back the change detector looks
    pub change_lookback_hours: u32,
    /// Half-width of the historical comparison window
    pub change_window_minutes: u32,
    /// Cap on each of the new/fading lists
    pub signal_list_limit: usize,
    /// Manual override switching sources off regardless of the catalog
    pub disabled_sources: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/fx_sentiment".to_string(),
            max_connections: 10,
        }
    }
}

impl SentimentConfig {
    #[must_use]
    pub fn freshness(&self) -> Duration {
        Duration::hours(i64::from(self.freshness_hours))
    }

    #[must_use]
    pub fn change_lookback(&self) -> Duration {
        Duration::hours(i64::from(self.change_lookback_hours))
    }

    #[must_use]
    pub fn change_half_window(&self) -> Duration {
        Duration::minutes(i64::from(self.change_window_minutes))
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            freshness_hours: 24,
            change_lookback_hours: 24,
            change_window_minutes: 30,
            signal_list_limit: 5,
            disabled_sources: Vec::new(),
        }
    }
}

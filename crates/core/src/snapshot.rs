//! Positioning readings and stored snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::Source;

/// A long/short split as reported by one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub long_percent: f64,
    pub short_percent: f64,
}

impl Reading {
    #[must_use]
    pub const fn new(long_percent: f64, short_percent: f64) -> Self {
        Self {
            long_percent,
            short_percent,
        }
    }

    /// True when both fields are numeric. No range check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.long_percent.is_nan() && !self.short_percent.is_nan()
    }

    /// True when both fields are finite and within 0..=100.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        let range = 0.0..=100.0;
        range.contains(&self.long_percent) && range.contains(&self.short_percent)
    }

    /// Long A/B is short B/A.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            long_percent: self.short_percent,
            short_percent: self.long_percent,
        }
    }
}

/// An immutable stored reading for one instrument from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Canonical instrument symbol
    pub symbol: String,
    pub source: Source,
    pub long_percent: f64,
    pub short_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        symbol: impl Into<String>,
        source: Source,
        reading: Reading,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            source,
            long_percent: reading.long_percent,
            short_percent: reading.short_percent,
            timestamp,
        }
    }

    #[must_use]
    pub const fn reading(&self) -> Reading {
        Reading::new(self.long_percent, self.short_percent)
    }
}

/// A reading as emitted by a scraper, before reconciliation.
///
/// The symbol may use any separator convention and the source name is
/// unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub symbol: String,
    pub source: String,
    pub long_percent: f64,
    pub short_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl RawReading {
    #[must_use]
    pub const fn reading(&self) -> Reading {
        Reading::new(self.long_percent, self.short_percent)
    }
}

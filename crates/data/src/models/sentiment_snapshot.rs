//! Sentiment snapshot data model.
//!
//! One row per reading from one source for one instrument. Rows are append-only;
//! retention is handled outside this crate.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use fx_sentiment_core::{decimal_to_f64, f64_to_decimal, Reading, Snapshot, Source};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored positioning reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SentimentSnapshotRecord {
    /// Auto-generated ID (optional for new records)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub id: Option<i64>,
    /// Canonical instrument symbol (e.g., "EUR/USD")
    pub instrument_symbol: String,
    /// Lowercase source name (e.g., "myfxbook")
    pub source: String,
    /// Percentage of traders long, 0-100
    pub long_percent: Decimal,
    /// Percentage of traders short, 0-100
    pub short_percent: Decimal,
    /// When the source reported the reading
    pub timestamp: DateTime<Utc>,
    /// Created timestamp (database default)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SentimentSnapshotRecord {
    /// Converts a reconciled snapshot into a storable record.
    ///
    /// # Errors
    /// Returns an error if either percentage is not representable as a decimal.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let to_decimal = |value: f64| {
            f64_to_decimal(value).ok_or_else(|| {
                anyhow!(
                    "Percentage {} for {} is not storable",
                    value,
                    snapshot.symbol
                )
            })
        };

        Ok(Self {
            id: None,
            instrument_symbol: snapshot.symbol.clone(),
            source: snapshot.source.as_str().to_string(),
            long_percent: to_decimal(snapshot.long_percent)?,
            short_percent: to_decimal(snapshot.short_percent)?,
            timestamp: snapshot.timestamp,
            created_at: None,
        })
    }

    /// Returns the parsed source.
    #[must_use]
    pub fn parsed_source(&self) -> Option<Source> {
        Source::parse(&self.source)
    }

    /// Converts back into the domain snapshot.
    ///
    /// # Errors
    /// Returns an error if the stored source name is unknown.
    pub fn to_snapshot(&self) -> Result<Snapshot> {
        let source = self
            .parsed_source()
            .ok_or_else(|| anyhow!("Unknown source in stored snapshot: {}", self.source))?;

        Ok(Snapshot::new(
            self.instrument_symbol.clone(),
            source,
            Reading::new(
                decimal_to_f64(self.long_percent),
                decimal_to_f64(self.short_percent),
            ),
            self.timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn from_snapshot_uses_lowercase_source() {
        let snapshot = Snapshot::new(
            "GBP/USD",
            Source::Forexfactory,
            Reading::new(61.5, 38.5),
            sample_timestamp(),
        );

        let record = SentimentSnapshotRecord::from_snapshot(&snapshot).unwrap();

        assert_eq!(record.instrument_symbol, "GBP/USD");
        assert_eq!(record.source, "forexfactory");
        assert_eq!(record.long_percent, dec!(61.5));
        assert_eq!(record.short_percent, dec!(38.5));
        assert!(record.id.is_none());
    }

    #[test]
    fn nan_percentage_is_rejected() {
        let snapshot = Snapshot::new(
            "GBP/USD",
            Source::Oanda,
            Reading::new(f64::NAN, 38.5),
            sample_timestamp(),
        );
        assert!(SentimentSnapshotRecord::from_snapshot(&snapshot).is_err());
    }

    #[test]
    fn to_snapshot_restores_reading() {
        let record = SentimentSnapshotRecord {
            id: Some(7),
            instrument_symbol: "AUD/USD".to_string(),
            source: "Dukascopy".to_string(),
            long_percent: dec!(44.25),
            short_percent: dec!(55.75),
            timestamp: sample_timestamp(),
            created_at: None,
        };

        let snapshot = record.to_snapshot().unwrap();

        assert_eq!(snapshot.source, Source::Dukascopy);
        assert_eq!(snapshot.reading(), Reading::new(44.25, 55.75));
    }

    #[test]
    fn unknown_source_fails_conversion() {
        let record = SentimentSnapshotRecord {
            id: None,
            instrument_symbol: "AUD/USD".to_string(),
            source: "tradingview".to_string(),
            long_percent: dec!(50),
            short_percent: dec!(50),
            timestamp: sample_timestamp(),
            created_at: None,
        };
        assert!(record.to_snapshot().is_err());
    }

    #[test]
    fn record_serializes_without_empty_id() {
        let snapshot = Snapshot::new(
            "EUR/USD",
            Source::Myfxbook,
            Reading::new(70.0, 30.0),
            sample_timestamp(),
        );
        let record = SentimentSnapshotRecord::from_snapshot(&snapshot).unwrap();

        let json = serde_json::to_string(&record).unwrap();

        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"source\":\"myfxbook\""));
    }
}

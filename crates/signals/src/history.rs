//! Historical bucketing.
//!
//! Rebuilds a sparse blended time series from raw per-source snapshots. Each
//! source keeps only its latest reading per bucket, and a bucket's blend uses
//! every source's latest value seen up to and including that bucket.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use fx_sentiment_core::{Snapshot, Source, SourceCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blend::{blend, SourceReadings};
use crate::contrarian::ContrarianSignal;

/// Bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hourly,
    Daily,
}

impl Interval {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Interval::Hourly => "hourly",
            Interval::Daily => "daily",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" | "1h" => Some(Self::Hourly),
            "daily" | "day" | "1d" => Some(Self::Daily),
            _ => None,
        }
    }

    /// ISO hour prefix (`2025-03-01T14`) or ISO date (`2025-03-01`).
    #[must_use]
    pub fn bucket_key(self, ts: DateTime<Utc>) -> String {
        match self {
            Interval::Hourly => ts.format("%Y-%m-%dT%H").to_string(),
            Interval::Daily => ts.format("%Y-%m-%d").to_string(),
        }
    }

    /// Start of the bucket containing `ts`.
    #[must_use]
    pub fn bucket_start(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let hour = match self {
            Interval::Hourly => ts.hour(),
            Interval::Daily => 0,
        };
        ts.date_naive()
            .and_hms_opt(hour, 0, 0)
            .map_or(ts, |naive| Utc.from_utc_datetime(&naive))
    }

    /// Length of `span` buckets.
    #[must_use]
    pub fn span(self, span: u32) -> Duration {
        match self {
            Interval::Hourly => Duration::hours(i64::from(span)),
            Interval::Daily => Duration::days(i64::from(span)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid interval: {} (expected hourly or daily)", s))
    }
}

/// Interval plus window size in hours or days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRange {
    pub interval: Interval,
    /// Window size in units of `interval`, at least 1
    pub span: u32,
}

impl HistoryRange {
    #[must_use]
    pub fn new(interval: Interval, span: u32) -> Self {
        Self {
            interval,
            span: span.max(1),
        }
    }

    #[must_use]
    pub fn hourly(hours: u32) -> Self {
        Self::new(Interval::Hourly, hours)
    }

    #[must_use]
    pub fn daily(days: u32) -> Self {
        Self::new(Interval::Daily, days)
    }

    /// Earliest timestamp inside the window ending at `now`.
    #[must_use]
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.interval.span(self.span.max(1))
    }
}

/// One non-empty bucket of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub bucket: String,
    pub bucket_start: DateTime<Utc>,
    pub blended_long: f64,
    pub blended_short: f64,
    pub total_weight: u32,
    pub sources_used: Vec<Source>,
    pub signal: ContrarianSignal,
}

/// Buckets snapshots into a sparse blended series.
///
/// Input is expected ascending by timestamp; it is re-sorted (stably) anyway.
/// Invalid readings and inactive sources are skipped, and a bucket left with
/// no valid reading does not appear in the output.
#[must_use]
pub fn bucket_series(
    snapshots: &[Snapshot],
    interval: Interval,
    sources: &SourceCatalog,
) -> Vec<HistoricalPoint> {
    let mut ordered: Vec<&Snapshot> = snapshots
        .iter()
        .filter(|s| sources.is_active(s.source) && s.reading().is_valid())
        .collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut running = SourceReadings::new();
    let mut points = Vec::new();
    let mut idx = 0;

    while idx < ordered.len() {
        let first = ordered[idx];
        let key = interval.bucket_key(first.timestamp);

        // Sorted input keeps each bucket contiguous; later readings overwrite
        // earlier ones from the same source.
        while idx < ordered.len() && interval.bucket_key(ordered[idx].timestamp) == key {
            let snapshot = ordered[idx];
            running.set(snapshot.source, snapshot.reading());
            idx += 1;
        }

        let state = blend(&running);
        points.push(HistoricalPoint {
            bucket: key,
            bucket_start: interval.bucket_start(first.timestamp),
            signal: ContrarianSignal::from_blend(&state),
            blended_long: state.blended_long,
            blended_short: state.blended_short,
            total_weight: state.total_weight,
            sources_used: state.sources_used,
        });
    }

    points
}

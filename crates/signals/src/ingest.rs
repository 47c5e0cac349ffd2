//! Ingestion of raw scraped readings into the snapshot store.

use anyhow::{Context, Result};
use fx_sentiment_core::{
    InstrumentCatalog, RawReading, ReadingRejection, Snapshot, SnapshotStore, Source,
    SourceCatalog,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::reconciler::SymbolReconciler;

/// Counters for one ingested batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub received: usize,
    pub stored: usize,
    /// No instrument matched the symbol
    pub unresolved: usize,
    /// Percentages missing or outside 0..=100
    pub invalid: usize,
    pub inactive: usize,
    pub unknown_source: usize,
    /// Stored with long/short swapped
    pub inverted: usize,
}

impl IngestReport {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.unresolved + self.invalid + self.inactive + self.unknown_source
    }

    fn record(&mut self, rejection: &ReadingRejection) {
        match rejection {
            ReadingRejection::UnresolvedSymbol(_) => self.unresolved += 1,
            ReadingRejection::UnknownSource(_) => self.unknown_source += 1,
            ReadingRejection::InactiveSource(_) => self.inactive += 1,
            ReadingRejection::OutOfRange { .. } => self.invalid += 1,
        }
    }
}

/// Validates and reconciles one raw reading.
///
/// # Errors
///
/// Returns the reason the reading cannot be stored.
pub fn prepare_reading(
    raw: &RawReading,
    reconciler: &SymbolReconciler<'_>,
    sources: &SourceCatalog,
) -> std::result::Result<(Snapshot, bool), ReadingRejection> {
    let source = Source::parse(&raw.source)
        .ok_or_else(|| ReadingRejection::UnknownSource(raw.source.clone()))?;
    if !sources.is_active(source) {
        return Err(ReadingRejection::InactiveSource(source.to_string()));
    }

    let reading = raw.reading();
    if !reading.is_in_range() {
        return Err(ReadingRejection::OutOfRange {
            long: reading.long_percent,
            short: reading.short_percent,
        });
    }

    let reconciled = reconciler
        .reconcile(&raw.symbol, reading)
        .ok_or_else(|| ReadingRejection::UnresolvedSymbol(raw.symbol.clone()))?;

    Ok((
        Snapshot::new(reconciled.symbol, source, reconciled.reading, raw.timestamp),
        reconciled.inverted,
    ))
}

/// Turns a batch of raw readings into storable snapshots.
///
/// Rejected readings are logged and counted; they never fail the batch.
/// `report.stored` is left for the caller to fill in after the append.
#[must_use]
pub fn prepare_batch(
    batch: &[RawReading],
    instruments: &InstrumentCatalog,
    sources: &SourceCatalog,
) -> (Vec<Snapshot>, IngestReport) {
    let reconciler = SymbolReconciler::new(instruments);
    let mut report = IngestReport {
        received: batch.len(),
        ..IngestReport::default()
    };
    let mut snapshots = Vec::with_capacity(batch.len());

    for raw in batch {
        match prepare_reading(raw, &reconciler, sources) {
            Ok((snapshot, inverted)) => {
                if inverted {
                    report.inverted += 1;
                }
                snapshots.push(snapshot);
            }
            Err(rejection) => {
                warn!(
                    symbol = %raw.symbol,
                    source = %raw.source,
                    timestamp = %raw.timestamp,
                    "Dropping reading: {}",
                    rejection
                );
                report.record(&rejection);
            }
        }
    }

    (snapshots, report)
}

/// Reconciles raw batches and appends them to a store.
pub struct Ingestor<S> {
    store: S,
    disabled_sources: Vec<String>,
}

impl<S: SnapshotStore> Ingestor<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            disabled_sources: Vec::new(),
        }
    }

    /// Sources to treat as inactive on top of the stored catalog.
    #[must_use]
    pub fn with_disabled_sources(mut self, disabled: Vec<String>) -> Self {
        self.disabled_sources = disabled;
        self
    }

    /// Reconciles and stores a batch in a single append.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogs cannot be loaded or the append fails.
    pub async fn ingest(&self, batch: &[RawReading]) -> Result<IngestReport> {
        let instruments = InstrumentCatalog::new(
            self.store
                .instruments()
                .await
                .context("Failed to load instrument catalog")?,
        );
        let sources = SourceCatalog::from_statuses(
            &self
                .store
                .sources()
                .await
                .context("Failed to load source catalog")?,
        )
        .with_disabled(self.disabled_sources.as_slice());

        let (snapshots, mut report) = prepare_batch(batch, &instruments, &sources);

        if !snapshots.is_empty() {
            report.stored = self
                .store
                .append(&snapshots)
                .await
                .context("Failed to append snapshots")?;
        }

        info!(
            received = report.received,
            stored = report.stored,
            unresolved = report.unresolved,
            invalid = report.invalid,
            inactive = report.inactive,
            unknown_source = report.unknown_source,
            inverted = report.inverted,
            "Ingested sentiment batch"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fx_sentiment_core::{Instrument, Reading};

    fn raw(symbol: &str, source: &str, long: f64, short: f64) -> RawReading {
        RawReading {
            symbol: symbol.to_string(),
            source: source.to_string(),
            long_percent: long,
            short_percent: short,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn instruments() -> InstrumentCatalog {
        InstrumentCatalog::new(vec![
            Instrument::forex("EUR", "USD"),
            Instrument::forex("CHF", "USD"),
        ])
    }

    #[test]
    fn batch_counts_each_rejection() {
        let batch = vec![
            raw("EURUSD", "Myfxbook", 62.0, 38.0),
            raw("USDCHF", "oanda", 70.0, 30.0),
            raw("XYZABC", "oanda", 50.0, 50.0),
            raw("EUR/USD", "tradingview", 50.0, 50.0),
            raw("EUR/USD", "fxblue", 50.0, 50.0),
            raw("EUR/USD", "dukascopy", 120.0, -20.0),
            raw("EUR/USD", "dukascopy", f64::NAN, 40.0),
        ];
        let sources = SourceCatalog::default().with_disabled(&["fxblue"]);

        let (snapshots, report) = prepare_batch(&batch, &instruments(), &sources);

        assert_eq!(snapshots.len(), 2);
        assert_eq!(report.received, 7);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.unknown_source, 1);
        assert_eq!(report.inactive, 1);
        assert_eq!(report.invalid, 2);
        assert_eq!(report.inverted, 1);
        assert_eq!(report.dropped(), 5);
    }

    #[test]
    fn reversed_symbol_is_stored_inverted() {
        let (snapshots, _) = prepare_batch(
            &[raw("USD_CHF", "oanda", 70.0, 30.0)],
            &instruments(),
            &SourceCatalog::default(),
        );

        assert_eq!(snapshots[0].symbol, "CHF/USD");
        assert_eq!(snapshots[0].source, Source::Oanda);
        assert_eq!(snapshots[0].reading(), Reading::new(30.0, 70.0));
    }

    #[test]
    fn boundaries_are_in_range() {
        let (snapshots, report) = prepare_batch(
            &[raw("EUR/USD", "oanda", 100.0, 0.0)],
            &instruments(),
            &SourceCatalog::default(),
        );
        assert_eq!(snapshots.len(), 1);
        assert_eq!(report.invalid, 0);
    }
}

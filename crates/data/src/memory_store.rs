//! In-memory [`SnapshotStore`] for fixtures, tests and offline runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fx_sentiment_core::{Instrument, Snapshot, SnapshotStore, SourceStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Catalog contents loaded from a JSON fixture.
///
/// ```json
/// {
///   "instruments": [{"symbol": "EUR/USD", "base": "EUR", "quote": "USD", "asset_class": "forex"}],
///   "sources": [{"name": "fxblue", "active": false}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFixture {
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub sources: Vec<SourceStatus>,
}

impl CatalogFixture {
    /// Reads a fixture file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog fixture: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog fixture: {}", path.display()))
    }
}

#[derive(Debug, Default)]
struct Inner {
    instruments: Vec<Instrument>,
    sources: Vec<SourceStatus>,
    snapshots: Vec<Snapshot>,
}

/// Shared, cloneable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new(instruments: Vec<Instrument>, sources: Vec<SourceStatus>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                instruments,
                sources,
                snapshots: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        Self::new(fixture.instruments, fixture.sources)
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.inner.read().await.snapshots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn instruments(&self) -> Result<Vec<Instrument>> {
        Ok(self.inner.read().await.instruments.clone())
    }

    async fn sources(&self) -> Result<Vec<SourceStatus>> {
        Ok(self.inner.read().await.sources.clone())
    }

    async fn snapshots_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Snapshot> = inner
            .snapshots
            .iter()
            .filter(|s| s.symbol == symbol && s.timestamp >= start && s.timestamp <= end)
            .cloned()
            .collect();
        // Stable: insertion order is kept for equal timestamps
        matching.sort_by_key(|s| s.timestamp);
        Ok(matching)
    }

    async fn append(&self, snapshots: &[Snapshot]) -> Result<usize> {
        self.inner
            .write()
            .await
            .snapshots
            .extend_from_slice(snapshots);
        Ok(snapshots.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use fx_sentiment_core::{Reading, Source};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn range_query_is_inclusive_and_sorted() {
        let store = MemorySnapshotStore::new(vec![Instrument::forex("EUR", "USD")], Vec::new());
        store
            .append(&[
                Snapshot::new("EUR/USD", Source::Oanda, Reading::new(60.0, 40.0), ts(12)),
                Snapshot::new("EUR/USD", Source::Oanda, Reading::new(55.0, 45.0), ts(10)),
                Snapshot::new("EUR/USD", Source::Oanda, Reading::new(50.0, 50.0), ts(8)),
                Snapshot::new("GBP/USD", Source::Oanda, Reading::new(50.0, 50.0), ts(10)),
            ])
            .await
            .unwrap();

        let found = store
            .snapshots_between("EUR/USD", ts(10), ts(12))
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].timestamp, ts(10));
        assert_eq!(found[1].timestamp, ts(12));
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemorySnapshotStore::default();
        let other = store.clone();
        other
            .append(&[Snapshot::new(
                "EUR/USD",
                Source::Myfxbook,
                Reading::new(60.0, 40.0),
                ts(1),
            )])
            .await
            .unwrap();

        assert!(!store.is_empty().await);
        let none = store
            .snapshots_between("EUR/USD", ts(1) + Duration::minutes(1), ts(2))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn fixture_parses_without_sources() {
        let fixture: CatalogFixture = serde_json::from_str(
            r#"{"instruments": [{"symbol": "EUR/USD", "base": "EUR", "quote": "USD", "asset_class": "forex"}]}"#,
        )
        .unwrap();

        assert_eq!(fixture.instruments[0], Instrument::forex("EUR", "USD"));
        assert!(fixture.sources.is_empty());
    }
}

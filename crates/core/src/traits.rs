use crate::instrument::Instrument;
use crate::snapshot::Snapshot;
use crate::source::SourceStatus;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only snapshot storage plus the read-only catalogs.
///
/// Implementations own retention; this engine only appends and reads ranges.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Instrument catalog rows.
    async fn instruments(&self) -> Result<Vec<Instrument>>;

    /// Source catalog rows.
    async fn sources(&self) -> Result<Vec<SourceStatus>>;

    /// Snapshots for one instrument with `start <= timestamp <= end`, ascending.
    async fn snapshots_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>>;

    /// Appends snapshots. Returns the number stored.
    async fn append(&self, snapshots: &[Snapshot]) -> Result<usize>;
}

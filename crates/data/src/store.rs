//! `PostgreSQL`-backed [`SnapshotStore`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fx_sentiment_core::{Instrument, Snapshot, SnapshotStore, SourceStatus};
use sqlx::PgPool;
use tracing::warn;

use crate::models::SentimentSnapshotRecord;
use crate::repositories::Repositories;

#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    repos: Repositories,
}

impl PgSnapshotStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repos: Repositories::new(pool),
        }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn instruments(&self) -> Result<Vec<Instrument>> {
        let records = self.repos.catalog.instruments().await?;
        let mut instruments = Vec::with_capacity(records.len());
        for record in records {
            match record.to_instrument() {
                Ok(instrument) => instruments.push(instrument),
                Err(e) => warn!("Skipping catalog row: {}", e),
            }
        }
        Ok(instruments)
    }

    async fn sources(&self) -> Result<Vec<SourceStatus>> {
        let records = self.repos.catalog.sources().await?;
        Ok(records.into_iter().map(SourceStatus::from).collect())
    }

    async fn snapshots_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>> {
        let records = self
            .repos
            .snapshots
            .query_by_symbol(symbol, start, end)
            .await
            .with_context(|| format!("Failed to query snapshots for {symbol}"))?;

        let mut snapshots = Vec::with_capacity(records.len());
        for record in &records {
            match record.to_snapshot() {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => warn!(id = ?record.id, "Skipping stored snapshot: {}", e),
            }
        }
        Ok(snapshots)
    }

    async fn append(&self, snapshots: &[Snapshot]) -> Result<usize> {
        let records = snapshots
            .iter()
            .map(SentimentSnapshotRecord::from_snapshot)
            .collect::<Result<Vec<_>>>()?;
        let ids = self.repos.snapshots.insert_batch(&records).await?;
        Ok(ids.len())
    }
}

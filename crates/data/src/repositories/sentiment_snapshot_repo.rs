//! Sentiment snapshot repository.
//!
//! Provides batch insert and time-range query operations for sentiment snapshots.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::SentimentSnapshotRecord;

/// Repository for sentiment snapshot operations.
#[derive(Debug, Clone)]
pub struct SentimentSnapshotRepository {
    pool: PgPool,
}

impl SentimentSnapshotRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a batch of sentiment snapshot records in one transaction.
    ///
    /// # Errors
    /// Returns an error if the database transaction fails.
    pub async fn insert_batch(&self, records: &[SentimentSnapshotRecord]) -> Result<Vec<i64>> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let mut ids = Vec::with_capacity(records.len());
        let mut tx = self.pool.begin().await?;

        for record in records {
            let row: (i64,) = sqlx::query_as(
                r#"
                INSERT INTO sentiment_snapshots
                    (instrument_symbol, source, long_percent, short_percent, timestamp)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(&record.instrument_symbol)
            .bind(&record.source)
            .bind(record.long_percent)
            .bind(record.short_percent)
            .bind(record.timestamp)
            .fetch_one(&mut *tx)
            .await?;

            ids.push(row.0);
        }

        tx.commit().await?;
        Ok(ids)
    }

    /// Queries snapshots for an instrument within a time range, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn query_by_symbol(
        &self,
        instrument_symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SentimentSnapshotRecord>> {
        let records = sqlx::query_as::<_, SentimentSnapshotRecord>(
            r#"
            SELECT id, instrument_symbol, source, long_percent, short_percent,
                   timestamp, created_at
            FROM sentiment_snapshots
            WHERE instrument_symbol = $1
              AND timestamp >= $2 AND timestamp <= $3
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(instrument_symbol)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

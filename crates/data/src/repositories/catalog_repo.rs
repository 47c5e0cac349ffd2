//! Read-only access to the instrument and source catalogs.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{InstrumentRecord, SourceRecord};

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists every instrument, ordered by symbol.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn instruments(&self) -> Result<Vec<InstrumentRecord>> {
        let records = sqlx::query_as::<_, InstrumentRecord>(
            r#"
            SELECT symbol, base, quote, asset_class
            FROM instruments
            ORDER BY symbol ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Lists every source with its active flag.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn sources(&self) -> Result<Vec<SourceRecord>> {
        let records = sqlx::query_as::<_, SourceRecord>(
            r#"
            SELECT name, active
            FROM sentiment_sources
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

//! Store selection shared by every command.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::Args;
use fx_sentiment_core::{
    AppConfig, ConfigLoader, Instrument, Snapshot, SnapshotStore, SourceStatus,
    DEFAULT_CONFIG_PATH,
};
use fx_sentiment_data::{
    CatalogFixture, CsvStorage, DatabaseClient, MemorySnapshotStore, PgSnapshotStore,
};
use fx_sentiment_signals::Ingestor;
use std::path::PathBuf;

/// Options selecting configuration and the snapshot store.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Config profile overlaid on the base file (e.g., "dev" reads Config.dev.toml)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Database connection URL (overrides database.url)
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub db_url: Option<String>,

    /// Catalog JSON fixture; runs against an in-memory store instead of the database
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Readings CSV loaded into the in-memory store (requires --fixture)
    #[arg(long, global = true, requires = "fixture")]
    pub snapshots: Option<PathBuf>,
}

impl StoreArgs {
    /// Loads configuration from the file, profile and environment.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be parsed.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.profile {
            Some(profile) => ConfigLoader::load_with_profile(&self.config, profile)?,
            None => ConfigLoader::load_from(&self.config)?,
        };
        if let Some(url) = &self.db_url {
            config.database.url.clone_from(url);
        }
        Ok(config)
    }

    /// Opens the store selected by the options.
    ///
    /// # Errors
    /// Returns an error if the fixture cannot be loaded or the database is unreachable.
    pub async fn open(&self, config: &AppConfig) -> Result<SentimentStore> {
        let Some(fixture_path) = &self.fixture else {
            let client = DatabaseClient::new(&config.database).await?;
            tracing::info!("Connected to database");
            return Ok(SentimentStore::Postgres(PgSnapshotStore::new(
                client.pool().clone(),
            )));
        };

        let fixture = CatalogFixture::from_path(fixture_path)?;
        tracing::info!(
            instruments = fixture.instruments.len(),
            path = %fixture_path.display(),
            "Loaded catalog fixture"
        );
        let store = MemorySnapshotStore::from_fixture(fixture);

        if let Some(csv_path) = &self.snapshots {
            let readings = CsvStorage::read_raw_readings(csv_path)?;
            Ingestor::new(store.clone())
                .with_disabled_sources(config.sentiment.disabled_sources.clone())
                .ingest(&readings)
                .await
                .context("Failed to load fixture snapshots")?;
        }

        Ok(SentimentStore::Memory(store))
    }
}

/// Either backing store, chosen at runtime.
#[derive(Debug, Clone)]
pub enum SentimentStore {
    Postgres(PgSnapshotStore),
    Memory(MemorySnapshotStore),
}

#[async_trait]
impl SnapshotStore for SentimentStore {
    async fn instruments(&self) -> Result<Vec<Instrument>> {
        match self {
            Self::Postgres(store) => store.instruments().await,
            Self::Memory(store) => store.instruments().await,
        }
    }

    async fn sources(&self) -> Result<Vec<SourceStatus>> {
        match self {
            Self::Postgres(store) => store.sources().await,
            Self::Memory(store) => store.sources().await,
        }
    }

    async fn snapshots_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>> {
        match self {
            Self::Postgres(store) => store.snapshots_between(symbol, start, end).await,
            Self::Memory(store) => store.snapshots_between(symbol, start, end).await,
        }
    }

    async fn append(&self, snapshots: &[Snapshot]) -> Result<usize> {
        match self {
            Self::Postgres(store) => store.append(snapshots).await,
            Self::Memory(store) => store.append(snapshots).await,
        }
    }
}

/// Parses an RFC 3339 evaluation instant.
///
/// # Errors
/// Returns a message suitable for clap when the value does not parse.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp (e.g. 2025-03-01T12:00:00Z): {e}"))
}

/// Prints a value as pretty JSON on stdout.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_instant_normalizes_offset() {
        assert_eq!(
            parse_instant("2025-03-01T14:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        );
        assert!(parse_instant("yesterday").is_err());
    }
}

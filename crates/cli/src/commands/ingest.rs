//! Ingest command: reconcile a CSV batch of scraped readings and store it.

use anyhow::Result;
use clap::Args;
use fx_sentiment_data::{CsvStorage, DatabaseClient};
use fx_sentiment_signals::Ingestor;
use std::path::PathBuf;

use super::store::{print_json, StoreArgs};

/// Arguments for the ingest command.
#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// CSV file with symbol,source,long_percent,short_percent,timestamp rows
    #[arg(short, long)]
    pub file: PathBuf,

    /// Apply schema migrations before inserting
    #[arg(long)]
    pub migrate: bool,
}

/// Runs the ingest command.
///
/// # Errors
/// Returns an error if the file cannot be read or the store rejects the batch.
pub async fn run_ingest(store_args: &StoreArgs, args: IngestArgs) -> Result<()> {
    let config = store_args.load_config()?;

    if args.migrate && store_args.fixture.is_none() {
        DatabaseClient::new(&config.database).await?.migrate().await?;
        tracing::info!("Migrations applied");
    }

    let readings = CsvStorage::read_raw_readings(&args.file)?;
    tracing::info!(
        count = readings.len(),
        file = %args.file.display(),
        "Read raw readings"
    );

    let store = store_args.open(&config).await?;
    let report = Ingestor::new(store)
        .with_disabled_sources(config.sentiment.disabled_sources)
        .ingest(&readings)
        .await?;

    print_json(&report)
}

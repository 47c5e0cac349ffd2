//! Overview command: currency strength, risk regime and signal changes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fx_sentiment_signals::SentimentService;

use super::store::{parse_instant, print_json, StoreArgs};

/// Arguments for the overview command.
#[derive(Args, Debug, Clone)]
pub struct OverviewArgs {
    /// Evaluation instant (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

/// Runs the overview command.
///
/// # Errors
/// Returns an error if the store cannot be opened or queried.
pub async fn run_overview(store_args: &StoreArgs, args: OverviewArgs) -> Result<()> {
    let config = store_args.load_config()?;
    let store = store_args.open(&config).await?;
    let service = SentimentService::new(store, config.sentiment);

    let overview = service
        .overview_at(args.at.unwrap_or_else(Utc::now))
        .await?;

    print_json(&overview)
}

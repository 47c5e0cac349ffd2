//! Latest command: current blended sentiment per instrument.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fx_sentiment_core::AssetClass;
use fx_sentiment_signals::{SentimentFilter, SentimentService};

use super::store::{parse_instant, print_json, StoreArgs};

/// Arguments for the latest command.
#[derive(Args, Debug, Clone)]
pub struct LatestArgs {
    /// Symbol to include (repeatable, any separator style, e.g. "EURUSD")
    #[arg(long = "symbol")]
    pub symbols: Vec<String>,

    /// Asset class to include (forex, commodity, index, crypto)
    #[arg(long)]
    pub asset_class: Option<String>,

    /// Only instruments with at least one fresh reading
    #[arg(long)]
    pub with_data: bool,

    /// Evaluation instant (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

impl LatestArgs {
    /// Builds the service filter from the arguments.
    ///
    /// # Errors
    /// Returns an error if the asset class is not recognised.
    pub fn filter(&self) -> Result<SentimentFilter> {
        Ok(SentimentFilter {
            symbols: self.symbols.clone(),
            asset_class: self
                .asset_class
                .as_deref()
                .map(str::parse::<AssetClass>)
                .transpose()?,
            with_data_only: self.with_data,
        })
    }
}

/// Runs the latest command.
///
/// # Errors
/// Returns an error if the store cannot be opened or queried.
pub async fn run_latest(store_args: &StoreArgs, args: LatestArgs) -> Result<()> {
    let filter = args.filter()?;
    let config = store_args.load_config()?;
    let store = store_args.open(&config).await?;
    let service = SentimentService::new(store, config.sentiment);

    let sentiment = service
        .latest_sentiment_at(&filter, args.at.unwrap_or_else(Utc::now))
        .await?;

    print_json(&sentiment)
}

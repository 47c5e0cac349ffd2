//! History command: bucketed blended series for one instrument.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fx_sentiment_signals::{HistoryRange, Interval, SentimentService};

use super::store::{parse_instant, print_json, StoreArgs};

/// Arguments for the history command.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Instrument symbol (e.g., "EUR/USD")
    #[arg(long)]
    pub symbol: String,

    /// Bucket width: hourly or daily
    #[arg(long, default_value = "hourly")]
    pub interval: String,

    /// Window size in hours (hourly) or days (daily)
    #[arg(long, default_value_t = 24)]
    pub range: u32,

    /// Evaluation instant (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

/// Runs the history command.
///
/// # Errors
/// Returns an error if the interval is invalid, the symbol is unknown, or the
/// store fails.
pub async fn run_history(store_args: &StoreArgs, args: HistoryArgs) -> Result<()> {
    let interval: Interval = args.interval.parse()?;
    let range = HistoryRange::new(interval, args.range);
    let config = store_args.load_config()?;
    let store = store_args.open(&config).await?;
    let service = SentimentService::new(store, config.sentiment);

    let series = service
        .historical_sentiment_at(&args.symbol, range, args.at.unwrap_or_else(Utc::now))
        .await?;

    print_json(&series)
}

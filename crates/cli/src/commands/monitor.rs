//! Monitor command: recompute the overview periodically with live config reloads.

use anyhow::Result;
use clap::Args;
use fx_sentiment_core::ConfigWatcher;
use fx_sentiment_signals::SentimentService;
use std::time::Duration;
use tokio::time::interval;

use super::store::{print_json, StoreArgs};

/// Arguments for the monitor command.
#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Seconds between evaluations
    #[arg(long, default_value_t = 300)]
    pub every: u64,

    /// Print the full overview JSON on every cycle instead of a summary line
    #[arg(long)]
    pub json: bool,
}

/// Runs the monitor command until Ctrl+C.
///
/// # Errors
/// Returns an error if the initial config or store cannot be loaded.
pub async fn run_monitor(store_args: &StoreArgs, args: MonitorArgs) -> Result<()> {
    let config = store_args.load_config()?;
    let store = store_args.open(&config).await?;

    let (watcher, settings) = ConfigWatcher::new(config, store_args.config.clone());
    let watcher = watcher.with_profile(store_args.profile.clone());
    tokio::spawn(async move {
        if let Err(e) = watcher.watch().await {
            tracing::error!("Config watcher stopped: {}", e);
        }
    });

    let service = SentimentService::with_config_receiver(store, settings);
    let mut ticker = interval(Duration::from_secs(args.every.max(1)));

    tracing::info!(every_secs = args.every, "Starting sentiment monitor");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match service.overview().await {
                    Ok(overview) => {
                        let leader = overview.currency_strength.first();
                        tracing::info!(
                            risk = overview.risk_sentiment.status.as_str(),
                            delta = overview.risk_sentiment.delta,
                            strongest = ?leader.map(|s| s.currency),
                            new_signals = overview.new_signals.len(),
                            fading_signals = overview.fading_signals.len(),
                            "Overview recomputed"
                        );
                        if args.json {
                            print_json(&overview)?;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Overview failed: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    tracing::info!("Sentiment monitor stopped");
    Ok(())
}

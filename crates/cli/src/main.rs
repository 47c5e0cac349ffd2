use clap::{Parser, Subcommand};

mod commands;

use commands::{HistoryArgs, IngestArgs, LatestArgs, MonitorArgs, OverviewArgs, StoreArgs};

#[derive(Parser)]
#[command(name = "fx-sentiment")]
#[command(about = "Retail positioning consensus for forex and CFD instruments", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and store a CSV batch of scraped readings
    Ingest(IngestArgs),
    /// Show the current blended sentiment per instrument
    Latest(LatestArgs),
    /// Show the bucketed sentiment history of one instrument
    History(HistoryArgs),
    /// Show currency strength, risk regime and new/fading signals
    Overview(OverviewArgs),
    /// Recompute the overview periodically, reloading config on change
    Monitor(MonitorArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ingest(args) => {
            commands::run_ingest(&cli.store, args).await?;
        }
        Commands::Latest(args) => {
            commands::run_latest(&cli.store, args).await?;
        }
        Commands::History(args) => {
            commands::run_history(&cli.store, args).await?;
        }
        Commands::Overview(args) => {
            commands::run_overview(&cli.store, args).await?;
        }
        Commands::Monitor(args) => {
            commands::run_monitor(&cli.store, args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn global_store_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "fx-sentiment",
            "latest",
            "--symbol",
            "EURUSD",
            "--symbol",
            "GBP_JPY",
            "--fixture",
            "catalog.json",
            "--snapshots",
            "readings.csv",
        ])
        .unwrap();

        assert_eq!(cli.store.fixture, Some(PathBuf::from("catalog.json")));
        assert_eq!(cli.store.snapshots, Some(PathBuf::from("readings.csv")));
        match cli.command {
            Commands::Latest(args) => assert_eq!(args.symbols, vec!["EURUSD", "GBP_JPY"]),
            _ => panic!("expected latest"),
        }
    }

    #[test]
    fn snapshots_require_fixture() {
        let result = Cli::try_parse_from(["fx-sentiment", "overview", "--snapshots", "x.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn history_defaults() {
        let cli = Cli::try_parse_from(["fx-sentiment", "history", "--symbol", "EUR/USD"]).unwrap();
        match cli.command {
            Commands::History(args) => {
                assert_eq!(args.interval, "hourly");
                assert_eq!(args.range, 24);
                assert!(args.at.is_none());
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn latest_filter_parses_asset_class() {
        let cli = Cli::try_parse_from([
            "fx-sentiment",
            "latest",
            "--asset-class",
            "commodities",
            "--with-data",
        ])
        .unwrap();
        let Commands::Latest(args) = cli.command else {
            panic!("expected latest");
        };

        let filter = args.filter().unwrap();

        assert_eq!(
            filter.asset_class,
            Some(fx_sentiment_core::AssetClass::Commodity)
        );
        assert!(filter.with_data_only);
    }
}

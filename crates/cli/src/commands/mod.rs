//! CLI commands for the sentiment engine.

pub mod history;
pub mod ingest;
pub mod latest;
pub mod monitor;
pub mod overview;
pub mod store;

pub use history::{run_history, HistoryArgs};
pub use ingest::{run_ingest, IngestArgs};
pub use latest::{run_latest, LatestArgs};
pub use monitor::{run_monitor, MonitorArgs};
pub use overview::{run_overview, OverviewArgs};
pub use store::StoreArgs;

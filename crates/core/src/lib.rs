//! Core domain types for the retail positioning consensus engine.
//!
//! Instruments, currencies, sources and snapshots, plus configuration and the
//! storage trait the engine reads through.

pub mod config;
pub mod config_loader;
pub mod config_watcher;
pub mod currency;
pub mod error;
pub mod instrument;
pub mod rounding;
pub mod snapshot;
pub mod source;
pub mod traits;

pub use config::{AppConfig, DatabaseConfig, SentimentConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use config_watcher::ConfigWatcher;
pub use currency::{canonical_legs, canonical_symbol, Currency};
pub use error::{ReadingRejection, SentimentError, SentimentResult};
pub use instrument::{compact, AssetClass, Instrument, InstrumentCatalog};
pub use rounding::{decimal_to_f64, f64_to_decimal, round_dp};
pub use snapshot::{RawReading, Reading, Snapshot};
pub use source::{Source, SourceCatalog, SourceStatus, SOURCE_COUNT, SOURCE_WEIGHTS};
pub use traits::SnapshotStore;

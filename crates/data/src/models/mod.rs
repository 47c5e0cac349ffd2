//! Data models for the sentiment engine.
//!
//! Percentages are stored as `rust_decimal::Decimal` (`NUMERIC` columns).
//! Models derive `sqlx::FromRow` for database compatibility.

pub mod catalog;
pub mod sentiment_snapshot;

pub use catalog::{InstrumentRecord, SourceRecord};
pub use sentiment_snapshot::SentimentSnapshotRecord;

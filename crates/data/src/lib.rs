//! Data storage for the sentiment engine.
//!
//! This crate provides:
//! - Database client for `PostgreSQL`
//! - Snapshot and catalog models
//! - Repositories for typed database access
//! - `SnapshotStore` implementations (`PostgreSQL` and in-memory)
//! - CSV import and export of readings

pub mod csv_storage;
pub mod database;
pub mod memory_store;
pub mod models;
pub mod repositories;
pub mod store;

// Re-export commonly used types
pub use csv_storage::CsvStorage;
pub use database::DatabaseClient;
pub use memory_store::{CatalogFixture, MemorySnapshotStore};
pub use store::PgSnapshotStore;

// Re-export models
pub use models::{InstrumentRecord, SentimentSnapshotRecord, SourceRecord};

// Re-export repositories
pub use repositories::{CatalogRepository, Repositories, SentimentSnapshotRepository};

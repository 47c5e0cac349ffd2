//! Database repositories for the sentiment engine.
//!
//! Each repository provides typed access to a specific table.

pub mod catalog_repo;
pub mod sentiment_snapshot_repo;

pub use catalog_repo::CatalogRepository;
pub use sentiment_snapshot_repo::SentimentSnapshotRepository;

use sqlx::PgPool;

/// Creates all repositories from a single database pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub catalog: CatalogRepository,
    pub snapshots: SentimentSnapshotRepository,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool.clone()),
            snapshots: SentimentSnapshotRepository::new(pool),
        }
    }
}

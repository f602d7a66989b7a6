//! Database Layer
//!
//! SQLite-backed persistence. `Database` owns the connection pool and runs
//! migrations on startup; the progression store implementation lives in
//! `beyonders`.

pub mod beyonders;
pub mod migrations;
pub mod models;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use models::{AdvancementRow, BeyonderRow, StabilityCheckRow};

/// Database file name inside the data directory.
const DB_FILE: &str = "aroodes.db";

/// Shared handle to the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database inside `data_dir` and bring the schema
    /// up to date.
    pub async fn new(data_dir: &Path) -> Result<Self, sqlx::Error> {
        std::fs::create_dir_all(data_dir).map_err(sqlx::Error::Io)?;
        let db_path = data_dir.join(DB_FILE);

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;
        info!(path = %db_path.display(), "Database ready");

        Ok(Self { pool })
    }

    /// Private in-memory database for tests.
    ///
    /// Pinned to a single pooled connection that is never recycled: every
    /// SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Access the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

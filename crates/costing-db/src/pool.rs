//! # Database Pool Management
//!
//! Opens the SQLite pool, applies the embedded schema and hands out
//! repositories.
//!
//! ```text
//! DbConfig::new(path) ──► Database::new(config).await ──► migrations
//!                                   │
//!                                   ├── db.yarns()        ──► YarnRepository
//!                                   ├── db.designs()      ──► DesignRepository
//!                                   └── db.color_legend() ──► ColorLegendRepository
//! ```
//!
//! Repositories clone the pool handle; each query checks out its own
//! connection. Foreign keys are switched on for every connection, and
//! deleting a design relies on `ON DELETE CASCADE` to remove its lot lines.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::color_legend::ColorLegendRepository;
use crate::repository::design::DesignRepository;
use crate::repository::yarn::YarnRepository;

/// Where the database lives and how many connections it gets.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl DbConfig {
    /// A file database, created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    /// A fresh, migrated in-memory database for tests.
    ///
    /// Every connection to `:memory:` sees its own database, so the pool
    /// is limited to one.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        }
    }
}

/// Database handle providing repository access.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects with WAL journaling and foreign keys on, then applies any
    /// pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening database");

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Applies pending migrations. Safe to call again.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn yarns(&self) -> YarnRepository {
        YarnRepository::new(self.pool.clone())
    }

    pub fn designs(&self) -> DesignRepository {
        DesignRepository::new(self.pool.clone())
    }

    pub fn color_legend(&self) -> ColorLegendRepository {
        ColorLegendRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }
}

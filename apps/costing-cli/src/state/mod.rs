//! # State Module
//!
//! Everything a command needs, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌────────────────────────────────┐    │
//! │  │   Database           │        │   AppConfig                    │    │
//! │  │   (SQLite pool,      │        │   defaults, currency format,   │    │
//! │  │    repositories)     │        │   updated_by, db_path          │    │
//! │  └──────────┬───────────┘        └───────────────┬────────────────┘    │
//! │             └───────────────┬────────────────────┘                     │
//! │                             ▼                                           │
//! │                        AppState  ──►  commands::*(&state, ...)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{AppConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};

use costing_db::Database;

/// Database handle plus read-only configuration.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState { db, config }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

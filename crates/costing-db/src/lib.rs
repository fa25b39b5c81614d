//! # costing-db: Database Layer for Fabric Costing
//!
//! This crate provides database access for the costing system.
//! It uses SQLite for local storage with sqlx for async operations, and
//! implements the collaborators the pure engine depends on: yarn
//! resolution, design persistence and the color legend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fabric Costing Data Flow                           │
//! │                                                                         │
//! │  CLI command (costing submit form.json)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    costing-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ YarnRepo       │    │ 001_initial_ │  │   │
//! │  │   │ SqlitePool    │◄───│ DesignRepo     │    │   schema.sql │  │   │
//! │  │   │               │    │ ColorLegendRepo│    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        <platform data dir>/fabric-costing/costing.db            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (yarn, design, legend)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use costing_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/costing.db")).await?;
//!
//! // Resolve yarn references up front, then run the pure pipeline
//! let catalog = db.yarns().catalog().await?;
//! let result = costing_core::pipeline::compute_costing(&request, &catalog)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::color_legend::ColorLegendRepository;
pub use repository::design::{DesignRepository, DesignSummary};
pub use repository::yarn::YarnRepository;

//! # Repository Module
//!
//! Database repository implementations for fabric costing.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.designs().insert(&design)                                  │
//! │       ▼                                                                 │
//! │  DesignRepository                                                      │
//! │  ├── insert(&self, design)        → conflict on duplicate name         │
//! │  ├── get_by_id / get_by_name                                           │
//! │  ├── update_status(&self, id, status)                                  │
//! │  └── delete(&self, id)            → lot lines cascade                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`yarn::YarnRepository`] - Yarn master list and price history
//! - [`design::DesignRepository`] - Finalized designs with lot lines
//! - [`color_legend::ColorLegendRepository`] - Color legend entries
//!
//! Queries are built at runtime with `sqlx::query` / `query_as` and mapped
//! through private `FromRow` structs, so the crate builds without a
//! `DATABASE_URL`.

pub mod color_legend;
pub mod design;
pub mod yarn;

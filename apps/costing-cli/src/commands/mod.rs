//! # Commands Module
//!
//! Handlers behind every `costing` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── design.rs   ◄─── cost, submit, design list/show/complete/delete
//! ├── yarn.rs     ◄─── Yarn master list and price history
//! ├── pattern.rs  ◄─── Pattern repeat sessions
//! └── legend.rs   ◄─── Color legend
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ costing yarn set 40s 0.4 250                                        │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  lib.rs::execute(&state, Command::Yarn(YarnCommand::Set { .. }))       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn set_yarn(                                                     │
//! │      state: &AppState,        ◄── Database + AppConfig                 │
//! │      label: &str, ...         ◄── From the command line                │
//! │  ) -> ApiResult<YarnSaved>                                              │
//! │         │                                                               │
//! │         │ (serde_json)                                                  │
//! │         ▼                                                               │
//! │  stdout: {"yarn":{"label":"40s",...},"price_changed":true}             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers take plain values rather than file paths so tests can call
//! them against an in-memory database.

pub mod design;
pub mod legend;
pub mod pattern;
pub mod yarn;

//! # costing
//!
//! Entry point of the fabric costing command-line tool.
//!
//! ```text
//! costing yarn set 40s 0.4 250
//! costing cost form.json
//! costing submit form.json --warp-pattern warp.json
//! costing design list --status pending
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

use clap::Parser;

use costing_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    costing_cli::run(Cli::parse()).await
}

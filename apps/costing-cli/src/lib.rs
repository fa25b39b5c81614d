//! # Fabric Costing CLI Library
//!
//! Command-line front end for the costing engine. `main.rs` only parses
//! arguments and hands them to [`run`].
//!
//! ## Module Organization
//! ```text
//! costing_cli/
//! ├── lib.rs          ◄─── You are here (clap definitions, startup, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (Database + AppConfig)
//! │   └── config.rs   ◄─── Layered configuration
//! ├── commands/
//! │   ├── design.rs   ◄─── cost, submit, design list/show/complete/delete
//! │   ├── yarn.rs     ◄─── yarn list/set/history
//! │   ├── pattern.rs  ◄─── pattern sessions
//! │   └── legend.rs   ◄─── color legend
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output
//! Results go to stdout as JSON. Errors go to stderr as
//! `{"code": ..., "message": ...}` with a non-zero exit status. Logs go to
//! stderr as well so stdout stays machine-readable.

pub mod commands;
pub mod error;
pub mod state;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use costing_core::DesignStatus;
use costing_db::{Database, DbConfig};
use error::{ApiError, ApiResult};
use state::{AppConfig, AppState};

// =============================================================================
// Command Line
// =============================================================================

/// Fabric costing: weights, cost breakdown and pattern repeats.
#[derive(Debug, Parser)]
#[command(name = "costing", version)]
pub struct Cli {
    /// Database file (overrides COSTING_DB_PATH and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Preview the costing of a form file without saving
    Cost {
        /// Design form (JSON)
        form: PathBuf,
    },

    /// Validate, cost and save a design
    Submit {
        /// Design form (JSON)
        form: PathBuf,

        /// Warp pattern session (JSON)
        #[arg(long)]
        warp_pattern: Option<PathBuf>,

        /// Weft pattern session (JSON)
        #[arg(long)]
        weft_pattern: Option<PathBuf>,
    },

    /// Saved designs
    #[command(subcommand)]
    Design(DesignCommand),

    /// Yarn master list
    #[command(subcommand)]
    Yarn(YarnCommand),

    /// Run a pattern session file
    Pattern {
        /// Pattern session (JSON)
        session: PathBuf,
    },

    /// Color legend
    #[command(subcommand)]
    Legend(LegendCommand),
}

#[derive(Debug, Subcommand)]
pub enum DesignCommand {
    /// List designs, newest first
    List {
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Show one design by ID or name
    Show { key: String },
    /// Mark a pending design completed
    Complete { key: String },
    /// Delete a design and its lot lines
    Delete { key: String },
}

#[derive(Debug, Subcommand)]
pub enum YarnCommand {
    /// List counts in dropdown order
    List,
    /// Create or update a count
    Set {
        label: String,
        hank_weight: f64,
        unit_price: f64,
    },
    /// Price history of a count
    History { label: String },
}

#[derive(Debug, Subcommand)]
pub enum LegendCommand {
    /// List legend entries
    List,
    /// Add a color
    Add {
        color: String,
        #[arg(long)]
        serial: u32,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Remove every color
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl From<StatusFilter> for DesignStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Pending => DesignStatus::Pending,
            StatusFilter::Completed => DesignStatus::Completed,
        }
    }
}

// =============================================================================
// Startup
// =============================================================================

/// Runs one command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging        tracing-subscriber, RUST_LOG override    │
/// │  2. Load Configuration        costing.toml + COSTING_* environment     │
/// │  3. Determine Database Path   --db > COSTING_DB_PATH > data dir        │
/// │  4. Connect to Database       SQLite, WAL, pending migrations          │
/// │  5. Execute Command           JSON to stdout, error JSON to stderr     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    init_tracing();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(path) = cli.db.clone() {
        config.db_path = Some(path);
    }

    let db_path = database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let state = AppState::new(db, config);

    let outcome = execute(&state, cli.command).await;
    state.db().close().await;

    match outcome {
        Ok(value) => {
            println!("{}", render(&value, cli.pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render(&err, cli.pretty)?);
            Ok(ExitCode::from(err.exit_code() as u8))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=costing_db=trace` - Show trace for the database crate only
/// - Default: INFO, DEBUG for the costing crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,costing=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.fabric-costing.costing/costing.db`
/// - **Windows**: `%APPDATA%\fabric-costing\costing\data\costing.db`
/// - **Linux**: `~/.local/share/costing/costing.db`
///
/// `COSTING_DB_PATH` arrives through the configuration layer as `db_path`.
fn database_path(config: &AppConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "fabric-costing", "costing")
        .context("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Could not create {}", data_dir.display()))?;

    Ok(data_dir.join("costing.db"))
}

fn render<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs a parsed command against the state.
pub async fn execute(state: &AppState, command: Command) -> ApiResult<serde_json::Value> {
    debug!(?command, "Executing command");

    match command {
        Command::Cost { form } => {
            let form = read_json(&form)?;
            to_json(commands::design::cost_design(state, &form).await?)
        }
        Command::Submit {
            form,
            warp_pattern,
            weft_pattern,
        } => {
            let form = read_json(&form)?;
            let warp = warp_pattern.as_deref().map(read_json).transpose()?;
            let weft = weft_pattern.as_deref().map(read_json).transpose()?;
            to_json(
                commands::design::submit_design(state, &form, warp.as_ref(), weft.as_ref())
                    .await?,
            )
        }
        Command::Design(command) => match command {
            DesignCommand::List { status } => {
                to_json(commands::design::list_designs(state, status.map(Into::into)).await?)
            }
            DesignCommand::Show { key } => {
                to_json(commands::design::show_design(state, &key).await?)
            }
            DesignCommand::Complete { key } => {
                to_json(commands::design::complete_design(state, &key).await?)
            }
            DesignCommand::Delete { key } => {
                to_json(commands::design::delete_design(state, &key).await?)
            }
        },
        Command::Yarn(command) => match command {
            YarnCommand::List => to_json(commands::yarn::list_yarns(state).await?),
            YarnCommand::Set {
                label,
                hank_weight,
                unit_price,
            } => to_json(commands::yarn::set_yarn(state, &label, hank_weight, unit_price).await?),
            YarnCommand::History { label } => {
                to_json(commands::yarn::yarn_history(state, &label).await?)
            }
        },
        Command::Pattern { session } => {
            let input = read_json(&session)?;
            to_json(commands::pattern::run_pattern(state, &input).await?)
        }
        Command::Legend(command) => match command {
            LegendCommand::List => to_json(commands::legend::list_legend(state).await?),
            LegendCommand::Add {
                color,
                serial,
                label,
            } => to_json(commands::legend::add_legend_entry(state, &color, &label, serial).await?),
            LegendCommand::Clear => to_json(commands::legend::clear_legend(state).await?),
        },
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ApiResult<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| ApiError::validation(format!("Cannot read {}: {}", path.display(), e)))?;

    serde_json::from_str(&text)
        .map_err(|e| ApiError::validation(format!("Invalid JSON in {}: {}", path.display(), e)))
}

fn to_json<T: Serialize>(value: T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use error::ErrorCode;

    async fn state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default())
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit_with_patterns() {
        let cli = Cli::try_parse_from([
            "costing",
            "submit",
            "form.json",
            "--warp-pattern",
            "warp.json",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        match cli.command {
            Command::Submit {
                form,
                warp_pattern,
                weft_pattern,
            } => {
                assert_eq!(form, PathBuf::from("form.json"));
                assert_eq!(warp_pattern, Some(PathBuf::from("warp.json")));
                assert!(weft_pattern.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_design_list_status() {
        let cli = Cli::try_parse_from(["costing", "design", "list", "--status", "completed"]).unwrap();
        match cli.command {
            Command::Design(DesignCommand::List { status }) => {
                assert_eq!(status.map(DesignStatus::from), Some(DesignStatus::Completed));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["costing", "design", "list", "--status", "done"]).is_err());
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let config = AppConfig {
            db_path: Some(PathBuf::from("/tmp/mill.db")),
            ..AppConfig::default()
        };
        assert_eq!(database_path(&config).unwrap(), PathBuf::from("/tmp/mill.db"));
    }

    #[tokio::test]
    async fn test_execute_yarn_commands() {
        let state = state().await;
        let saved = execute(
            &state,
            Command::Yarn(YarnCommand::Set {
                label: "40s".to_string(),
                hank_weight: 0.4,
                unit_price: 250.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(saved["yarn"]["label"], "40s");
        assert_eq!(saved["price_changed"], true);

        let list = execute(&state, Command::Yarn(YarnCommand::List)).await.unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_execute_legend_clear() {
        let state = state().await;
        let args = ["costing", "legend", "add", "#000080", "--serial", "1"];
        let cli = Cli::try_parse_from(args).unwrap();
        execute(&state, cli.command).await.unwrap();

        let cli = Cli::try_parse_from(["costing", "legend", "clear"]).unwrap();
        let cleared = execute(&state, cli.command).await.unwrap();
        assert_eq!(cleared["removed"], 1);

        let list = execute(&state, Command::Legend(LegendCommand::List)).await.unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_execute_missing_file() {
        let state = state().await;
        let err = execute(
            &state,
            Command::Cost {
                form: PathBuf::from("/nonexistent/form.json"),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("Cannot read"));
    }
}

//! # Configuration
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COSTING_*`, nested with `__`)
//! 2. Config file (`costing.toml`, or the path in `COSTING_CONFIG`)
//! 3. Defaults (this file and [`CostingDefaults`])
//!
//! ```toml
//! currency_symbol = "₹"
//! updated_by = "asha"
//!
//! [defaults]
//! washing_cost = 9.5
//! profit_percent = 12
//! ```
//!
//! Same keys from the environment:
//! `COSTING_UPDATED_BY=asha COSTING_DEFAULTS__PROFIT_PERCENT=12`.
//!
//! Configuration is read-only after initialization.

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use costing_core::{CostingDefaults, Money, CURRENCY_DECIMALS, WEIGHT_DECIMALS};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "COSTING_CONFIG";

/// Config file read when `COSTING_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "costing.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Starting values for empty optional form fields.
    pub defaults: CostingDefaults,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u32,

    /// Number of decimal places for weights
    pub weight_decimals: u32,

    /// Name recorded in yarn price history
    pub updated_by: String,

    /// Database file; the platform data directory when unset
    pub db_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            defaults: CostingDefaults::default(),
            currency_symbol: "₹".to_string(),
            currency_decimals: CURRENCY_DECIMALS,
            weight_decimals: WEIGHT_DECIMALS,
            updated_by: "system".to_string(),
            db_path: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the config file and `COSTING_*` variables.
    ///
    /// A missing config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("COSTING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Formats a money value as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_paise(90225)), "₹902.25");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{:.*}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            self.currency_decimals as usize,
            amount.as_rupees().abs()
        )
    }

    /// Formats a weight in kg.
    pub fn format_weight(&self, kg: f64) -> String {
        format!("{:.*} kg", self.weight_decimals as usize, kg)
    }
}

//! # Form Defaults
//!
//! Business-configured starting values for a new costing form.
//!
//! These are not physics. Mills change them, so they are a serde struct the
//! CLI loads from its configuration file and hands to
//! [`crate::validation::DesignForm::to_request`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LotKind, Rate};

/// Defaults applied to empty optional form fields.
///
/// Amounts are in rupees as a user would type them. `profit_percent` is a
/// 0-100 percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CostingDefaults {
    pub washing_cost: f64,
    pub transport_cost: f64,
    pub mending_cost: f64,
    pub twisting_cost: f64,
    pub profit_percent: f64,
    pub warp_constant: f64,
    pub weft_constant: f64,
}

impl Default for CostingDefaults {
    fn default() -> Self {
        CostingDefaults {
            washing_cost: 8.0,
            transport_cost: 7.0,
            mending_cost: 10.0,
            twisting_cost: 0.0,
            profit_percent: 15.0,
            warp_constant: 1.45,
            weft_constant: 1.35,
        }
    }
}

impl CostingDefaults {
    /// Default material constant for a lot direction.
    pub fn constant_for(&self, kind: LotKind) -> f64 {
        match kind {
            LotKind::Warp => self.warp_constant,
            LotKind::Weft => self.weft_constant,
        }
    }

    pub fn profit_rate(&self) -> Rate {
        Rate::from_percentage(self.profit_percent)
    }

    pub fn washing(&self) -> Money {
        Money::round_from(self.washing_cost)
    }

    pub fn transport(&self) -> Money {
        Money::round_from(self.transport_cost)
    }

    pub fn mending(&self) -> Money {
        Money::round_from(self.mending_cost)
    }

    pub fn twisting(&self) -> Money {
        Money::round_from(self.twisting_cost)
    }
}

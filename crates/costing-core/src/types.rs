//! # Domain Types
//!
//! Core domain types shared by the engine, the database layer and the CLI.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   YarnCount     │   │      Lot        │   │  DesignCosting  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  label "40s"    │──►│  count_label    │──►│  id (UUID)      │       │
//! │  │  hank_weight    │   │  reed_or_pick   │   │  design_name    │       │
//! │  │  unit_price     │   │  cost, dyeing   │   │  warps / wefts  │       │
//! │  └─────────────────┘   │  constant       │   │  cost breakdown │       │
//! │                        └─────────────────┘   │  status         │       │
//! │  ┌─────────────────┐                         └─────────────────┘       │
//! │  │ YarnPriceHistory│   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  append-only    │   │ PatternSegment  │   │ColorLegendEntry │       │
//! │  └─────────────────┘   │  color, threads │   │ color, serial   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! A design has a UUID `id` used for relations and a unique, human-facing
//! `design_name`. Yarns are keyed by their count label alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pattern::PatternReport;

// =============================================================================
// Rate
// =============================================================================

/// A percentage held in basis points (1 bps = 0.01%).
///
/// Used for the profit share (default 1500 = 15%) and GST (500 = 5%).
/// The form edits a 0-100 percentage, the stored design keeps a 0-1
/// fraction, and the arithmetic runs on integer basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a 0-100 percentage (`15.0` → 1500 bps).
    ///
    /// Negative and non-finite input clamps to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Rate::zero();
        }
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a 0-100 percentage.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the rate as a 0-1 fraction.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Yarn Master Data
// =============================================================================

/// A yarn count from the master list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct YarnCount {
    /// Count label, unique (e.g. "40s", "2/40s").
    pub label: String,

    /// Conversion constant from thread count to mass for this count.
    pub hank_weight: f64,

    /// Price per kg in rupees.
    pub unit_price: f64,
}

impl YarnCount {
    pub fn new(label: impl Into<String>, hank_weight: f64, unit_price: f64) -> Self {
        YarnCount {
            label: label.into(),
            hank_weight,
            unit_price,
        }
    }
}

/// One price change of a yarn count. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct YarnPriceHistory {
    pub yarn_label: String,
    pub price: f64,
    pub updated_by: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Lots
// =============================================================================

/// Which yarn system a lot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LotKind {
    /// Lengthwise yarn; density is the reed.
    Warp,
    /// Widthwise yarn; density is the pick.
    Weft,
}

impl LotKind {
    /// Name of the density field on the form ("reed" or "pick").
    pub const fn density_field(&self) -> &'static str {
        match self {
            LotKind::Warp => "reed",
            LotKind::Weft => "pick",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            LotKind::Warp => "warp",
            LotKind::Weft => "weft",
        }
    }
}

/// One warp or weft lot of a costing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Lot {
    /// Yarn count label, resolved against the yarn master list.
    pub count_label: String,

    /// Reed for warp lots, pick for weft lots.
    pub reed_or_pick: f64,

    /// Yarn cost per kg in rupees.
    pub cost_per_unit: f64,

    /// Dyeing cost per kg in rupees.
    pub dyeing_cost_per_unit: f64,

    /// Material multiplier (warp and weft have different defaults).
    pub constant: f64,
}

impl Lot {
    pub fn new(
        count_label: impl Into<String>,
        reed_or_pick: f64,
        cost_per_unit: f64,
        dyeing_cost_per_unit: f64,
        constant: f64,
    ) -> Self {
        Lot {
            count_label: count_label.into(),
            reed_or_pick,
            cost_per_unit,
            dyeing_cost_per_unit,
            constant,
        }
    }

    /// Yarn cost plus dyeing cost, per kg.
    #[inline]
    pub fn rate_per_kg(&self) -> f64 {
        self.cost_per_unit + self.dyeing_cost_per_unit
    }
}

/// A lot as stored with a finalized design, with its computed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DesignLot {
    #[serde(flatten)]
    pub lot: Lot,

    /// Weight in kg, rounded to 3 decimals.
    pub weight: f64,
}

// =============================================================================
// Design Status
// =============================================================================

/// Lifecycle of a design request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DesignStatus {
    /// Costed and saved, awaiting the design request workflow.
    Pending,
    /// Design request fulfilled.
    Completed,
}

impl DesignStatus {
    /// The only allowed transition is `Pending → Completed`.
    pub fn can_transition_to(&self, next: DesignStatus) -> bool {
        matches!((self, next), (DesignStatus::Pending, DesignStatus::Completed))
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DesignStatus::Pending => "pending",
            DesignStatus::Completed => "completed",
        }
    }
}

impl Default for DesignStatus {
    fn default() -> Self {
        DesignStatus::Pending
    }
}

// =============================================================================
// Design Costing
// =============================================================================

/// A finalized, persisted design with its full cost breakdown.
///
/// ## Immutability
/// Once saved only `status` may change. A design with a wrong costing is
/// deleted and submitted again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DesignCosting {
    pub id: String,
    pub design_name: String,
    #[ts(as = "String")]
    pub design_date: NaiveDate,
    pub width: f64,
    pub warps: Vec<DesignLot>,
    pub wefts: Vec<DesignLot>,
    pub warp_cost: Money,
    pub weft_cost: Money,
    pub weaving_cost: Money,
    pub washing_cost: Money,
    pub mending_cost: Money,
    pub twisting_cost: Money,
    pub transport_cost: Money,
    /// Profit share as a 0-1 fraction.
    pub profit_percent: f64,
    pub profit: Money,
    pub subtotal: Money,
    pub gst: Money,
    pub final_total: Money,
    pub status: DesignStatus,
    pub warp_pattern: Option<PatternReport>,
    pub weft_pattern: Option<PatternReport>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl DesignCosting {
    /// Sum of the five processing costs.
    pub fn processing_cost(&self) -> Money {
        self.weaving_cost
            + self.washing_cost
            + self.mending_cost
            + self.twisting_cost
            + self.transport_cost
    }

    /// Warp cost plus weft cost.
    pub fn material_cost(&self) -> Money {
        self.warp_cost + self.weft_cost
    }
}

// =============================================================================
// Pattern Inputs
// =============================================================================

/// One entry of the color legend used by a pattern session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColorLegendEntry {
    /// Hex code or color name.
    pub color: String,
    pub label: String,
    pub serial_number: u32,
}

/// One colored stretch of threads inside a pattern repeat.
///
/// Segment order matters: the ordered list is the repeat unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatternSegment {
    pub color: String,
    pub thread_count: u32,
}

impl PatternSegment {
    pub fn new(color: impl Into<String>, thread_count: u32) -> Self {
        PatternSegment {
            color: color.into(),
            thread_count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # costing-core: Pure Calculation Engine for Fabric Costing
//!
//! This crate is the **heart** of the costing system. It turns fabric
//! specifications into yarn weights and a full cost breakdown, and works
//! out how a color pattern repeats across a fabric width. Everything here is
//! a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fabric Costing Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    costing CLI (apps/costing-cli)               │   │
//! │  │    cost, submit, design, yarn, pattern, legend                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ costing-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │   yarn   │►│  weight  │►│aggregate │►│ pipeline │          │   │
//! │  │   │ resolver │ │   kg     │ │ Σ cost×kg│ │ profit,  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ │ GST,total│          │   │
//! │  │                                          └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ pattern  │ │validation│ │  money   │ │ numeric  │          │   │
//! │  │   │ repeats  │ │  forms   │ │  paise   │ │ coercion │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 costing-db (Database Layer)                     │   │
//! │  │        yarn master, designs, color legend on SQLite             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (YarnCount, Lot, DesignCosting, etc.)
//! - [`money`] - Money type in integer paise
//! - [`numeric`] - Coerce-or-default for form text, rounding helpers
//! - [`yarn`] - Yarn reference resolver and count-label ordering
//! - [`weight`] - Weight calculator
//! - [`aggregate`] - Lot cost aggregator
//! - [`pipeline`] - Costing pipeline (material → final total)
//! - [`pattern`] - Pattern repeat engine
//! - [`validation`] - Form validation before submission
//! - [`defaults`] - Business-configured form defaults
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, bit-identical output
//! 2. **No I/O**: yarn references are resolved up front into a [`yarn::YarnCatalog`]
//! 3. **Integer Money**: currency is rounded to paise once, then added as integers
//! 4. **Explicit Errors**: pattern invariants fail loudly instead of returning nothing
//!
//! ## Example Usage
//!
//! ```rust
//! use costing_core::pipeline::{compute_costing, CostingRequest};
//! use costing_core::types::{Lot, Rate, YarnCount};
//! use costing_core::yarn::YarnCatalog;
//! use costing_core::Money;
//!
//! let catalog = YarnCatalog::from_iter([YarnCount::new("40s", 0.4, 250.0)]);
//!
//! let request = CostingRequest {
//!     width: 50.0,
//!     warps: vec![Lot::new("40s", 100.0, 100.0, 20.0, 1.35)],
//!     wefts: vec![Lot::new("40s", 80.0, 90.0, 15.0, 1.35)],
//!     weaving_cost: Money::from_paise(4575),
//!     washing_cost: Money::from_paise(1250),
//!     mending_cost: Money::from_paise(825),
//!     twisting_cost: Money::zero(),
//!     transport_cost: Money::from_paise(2500),
//!     profit_rate: Rate::from_bps(1500),
//! };
//!
//! let result = compute_costing(&request, &catalog).unwrap();
//! assert_eq!(result.final_total.paise(), 90225); // ₹902.25
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod defaults;
pub mod error;
pub mod money;
pub mod numeric;
pub mod pattern;
pub mod pipeline;
pub mod types;
pub mod validation;
pub mod weight;
pub mod yarn;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use costing_core::Money` instead of
// `use costing_core::money::Money`

pub use defaults::CostingDefaults;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Goods and Services Tax applied to the subtotal (5%).
///
/// Hard policy constant; deliberately absent from [`CostingDefaults`].
pub const GST_RATE: types::Rate = types::Rate::from_bps(500);

/// Divisor of the weight formula.
///
/// Converts `width × reed × constant` (inches × ends per inch) into hanks
/// of 840 yards before multiplying by hank weight.
pub const WEIGHT_DIVISOR: f64 = 840.0;

/// Decimal places used for weights (kg) in output and storage.
pub const WEIGHT_DECIMALS: u32 = 3;

/// Decimal places used for currency in output and storage.
pub const CURRENCY_DECIMALS: u32 = 2;

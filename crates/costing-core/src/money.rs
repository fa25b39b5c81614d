//! # Money Module
//!
//! Provides the `Money` type for every currency value the engine reports.
//!
//! ## Where Floats Stop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ENGINEERING SIDE (f64)              CURRENCY SIDE (Money, paise)       │
//! │                                                                         │
//! │  width × reed × constant / 840                                          │
//! │       × hank weight  ──► weight (kg)                                    │
//! │                                                                         │
//! │  Σ (cost + dyeing) × weight ──► Money::round_from() ──► warp/weft cost │
//! │                                                                         │
//! │  From here on: integer paise only                                       │
//! │    processing + material ──► profit ──► subtotal ──► GST ──► total     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weights and per-kg rates are physical quantities and stay `f64` at full
//! precision. A value becomes `Money` exactly once, rounded to the nearest
//! paisa, and every later stage is integer arithmetic. Displayed totals
//! therefore always add up.
//!
//! ## Usage
//! ```rust
//! use costing_core::money::Money;
//!
//! let weaving = Money::from_paise(4575);       // ₹45.75
//! let transport = Money::round_from(25.0);     // ₹25.00
//! assert_eq!((weaving + transport).paise(), 7075);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never needs a special case
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as paise**: the frontend formats for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use costing_core::money::Money;
    ///
    /// let cost = Money::from_paise(38571); // ₹385.71
    /// assert_eq!(cost.paise(), 38571);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Rounds a rupee amount to the nearest paisa.
    ///
    /// Halves round away from zero. Non-finite input (which only arises
    /// from upstream garbage) becomes zero rather than saturating.
    ///
    /// ## Example
    /// ```rust
    /// use costing_core::money::Money;
    ///
    /// assert_eq!(Money::round_from(385.714_285).paise(), 38571);
    /// assert_eq!(Money::round_from(0.125).paise(), 13);
    /// assert_eq!(Money::round_from(f64::NAN).paise(), 0);
    /// ```
    pub fn round_from(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    ///
    /// ## Example
    /// ```rust
    /// use costing_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(85929).rupees(), 859);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as rupees for display or export.
    ///
    /// Never feed this back into a calculation.
    #[inline]
    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a rate (profit share, GST) and rounds to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. The `+5000` rounds
    /// halves up, which matches `round(amount × rate, 2)` for the
    /// non-negative amounts the pipeline produces.
    ///
    /// ## Example
    /// ```rust
    /// use costing_core::money::Money;
    /// use costing_core::types::Rate;
    ///
    /// let subtotal = Money::from_paise(85929);         // ₹859.29
    /// let gst = subtotal.apply_rate(Rate::from_bps(500));
    /// // ₹859.29 × 5% = ₹42.9645 → ₹42.96
    /// assert_eq!(gst.paise(), 4296);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 keeps large subtotals from overflowing during the multiply
        let paise = (self.0 as i128 * rate.bps() as i128 + 5000).div_euclid(10000);
        Money::from_paise(paise as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as `₹1234.56`.
///
/// This is for logs and debugging. The configured formatter in the CLI
/// handles user-facing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(paise: i64) -> Self {
        Money::from_paise(paise)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

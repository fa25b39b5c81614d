//! # Weight Calculator
//!
//! Converts the density of one lot into yarn mass.
//!
//! ```text
//! weight (kg) = (width × reed_or_pick × constant / 840) × hank_weight
//! ```
//!
//! Results are returned at full precision. Round with
//! [`crate::numeric::round_weight`] only when displaying or storing, so
//! several lots summed together do not compound rounding error.

use crate::WEIGHT_DIVISOR;

/// Computes the weight of one warp or weft lot in kg.
///
/// ## Example
/// ```rust
/// use costing_core::numeric::round_weight;
/// use costing_core::weight::compute_weight;
///
/// let kg = compute_weight(50.0, 100.0, 1.35, 0.4);
/// assert_eq!(round_weight(kg), 3.214);
/// ```
pub fn compute_weight(width: f64, reed_or_pick: f64, constant: f64, hank_weight: f64) -> f64 {
    let kg = (width * reed_or_pick * constant / WEIGHT_DIVISOR) * hank_weight;
    if kg.is_finite() {
        kg
    } else {
        0.0
    }
}

/// Number of threads across the fabric for one direction.
///
/// Feeds the pattern repeat engine: `round(width × reed_or_pick)`.
/// Negative or non-finite products give 0.
pub fn target_thread_count(width: f64, reed_or_pick: f64) -> u32 {
    let threads = (width * reed_or_pick).round();
    if !threads.is_finite() || threads <= 0.0 {
        0
    } else if threads >= u32::MAX as f64 {
        u32::MAX
    } else {
        threads as u32
    }
}

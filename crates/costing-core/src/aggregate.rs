//! # Lot Cost Aggregator
//!
//! Sums `(cost_per_unit + dyeing_cost_per_unit) × weight` across the lots of
//! one direction. Warps and wefts are aggregated separately and stay
//! separate through the pipeline.

use crate::error::{CoreError, CoreResult};
use crate::types::Lot;

/// Total material cost of a list of lots, in rupees at full precision.
///
/// `weights[i]` belongs to `lots[i]`. The pipeline converts the total to
/// [`crate::Money`]; nothing here rounds.
///
/// ## Errors
/// [`CoreError::LotWeightMismatch`] when the two slices differ in length.
///
/// ## Example
/// ```rust
/// use costing_core::aggregate::aggregate;
/// use costing_core::types::Lot;
///
/// let lots = [Lot::new("40s", 100.0, 100.0, 20.0, 1.35)];
/// let total = aggregate(&lots, &[2.5]).unwrap();
/// assert_eq!(total, 300.0);
///
/// assert_eq!(aggregate(&[], &[]).unwrap(), 0.0);
/// ```
pub fn aggregate(lots: &[Lot], weights: &[f64]) -> CoreResult<f64> {
    if lots.len() != weights.len() {
        return Err(CoreError::LotWeightMismatch {
            lots: lots.len(),
            weights: weights.len(),
        });
    }

    Ok(lots
        .iter()
        .zip(weights)
        .map(|(lot, weight)| lot_cost(lot, *weight))
        .sum())
}

/// Cost of one lot. Non-finite parts contribute nothing.
fn lot_cost(lot: &Lot, weight: f64) -> f64 {
    let cost = lot.rate_per_kg() * weight;
    if cost.is_finite() {
        cost
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lot(cost: f64, dyeing: f64) -> Lot {
        Lot::new("40s", 100.0, cost, dyeing, 1.35)
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_two_lots() {
        let total = aggregate(&[lot(100.0, 20.0), lot(90.0, 15.0)], &[2.0, 1.0]).unwrap();
        assert!((total - 345.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_costs_contribute_nothing() {
        let total = aggregate(&[lot(0.0, 0.0), lot(10.0, 0.0)], &[5.0, 0.0]).unwrap();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let err = aggregate(&[lot(100.0, 20.0)], &[]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::LotWeightMismatch { lots: 1, weights: 0 }
        ));
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_linear(
            cost_a in 0.0f64..1000.0,
            dye_a in 0.0f64..200.0,
            w_a in 0.0f64..50.0,
            cost_b in 0.0f64..1000.0,
            dye_b in 0.0f64..200.0,
            w_b in 0.0f64..50.0,
        ) {
            let a = lot(cost_a, dye_a);
            let b = lot(cost_b, dye_b);

            let both = aggregate(&[a.clone(), b.clone()], &[w_a, w_b]).unwrap();
            let split = aggregate(&[a], &[w_a]).unwrap() + aggregate(&[b], &[w_b]).unwrap();

            prop_assert!((both - split).abs() <= 1e-9 * both.abs().max(1.0));
        }
    }
}

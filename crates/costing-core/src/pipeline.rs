//! # Costing Pipeline
//!
//! The ordered derivation from lots and processing costs to a final price.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Weights        per lot  (weight calculator, hank weight from catalog)│
//! │         │                                                               │
//! │  2. Material       warp_cost + weft_cost   (lot cost aggregator)        │
//! │         │                                                               │
//! │  3. Processing     weaving + washing + mending + twisting + transport   │
//! │         │                                                               │
//! │  4. Profit         profit_rate × (material + processing)                │
//! │         │                                                               │
//! │  5. Subtotal       material + processing + profit                       │
//! │         │                                                               │
//! │  6. GST            5% × subtotal                                        │
//! │         │                                                               │
//! │  7. Final total    subtotal + GST                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no cache between stages. [`compute_costing`] re-derives every
//! stage from its inputs on each call, so a change to any input (width, a
//! lot field, a processing cost, the profit rate) is always reflected
//! downstream.
//!
//! ## Rounding
//! Warp and weft cost are rounded to paise once, straight from the
//! full-precision aggregate. Profit, GST and all totals are integer paise.
//! Reported weights are rounded to 3 decimals; the costs are computed from
//! the unrounded weights.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::aggregate;
use crate::error::CoreResult;
use crate::money::Money;
use crate::numeric::round_weight;
use crate::types::{DesignCosting, DesignLot, DesignStatus, Lot, Rate};
use crate::weight::compute_weight;
use crate::yarn::YarnCatalog;
use crate::GST_RATE;

// =============================================================================
// Request / Result
// =============================================================================

/// Typed input of one costing run.
///
/// Built from a validated form by
/// [`crate::validation::DesignForm::to_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostingRequest {
    pub width: f64,
    pub warps: Vec<Lot>,
    pub wefts: Vec<Lot>,
    pub weaving_cost: Money,
    pub washing_cost: Money,
    pub mending_cost: Money,
    pub twisting_cost: Money,
    pub transport_cost: Money,
    pub profit_rate: Rate,
}

impl CostingRequest {
    /// Sum of the five processing costs.
    pub fn processing_cost(&self) -> Money {
        self.weaving_cost
            + self.washing_cost
            + self.mending_cost
            + self.twisting_cost
            + self.transport_cost
    }
}

/// Output of one costing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostingResult {
    /// Weight of each warp lot in kg (3 decimals), index-aligned with the request.
    pub warp_weights: Vec<f64>,
    /// Weight of each weft lot in kg (3 decimals), index-aligned with the request.
    pub weft_weights: Vec<f64>,
    /// Sum of all warp lot weights in kg (3 decimals).
    pub total_warp_weight: f64,
    /// Sum of all weft lot weights in kg (3 decimals).
    pub total_weft_weight: f64,
    pub warp_cost: Money,
    pub weft_cost: Money,
    pub material_cost: Money,
    pub processing_cost: Money,
    pub profit: Money,
    pub subtotal: Money,
    pub gst: Money,
    pub final_total: Money,
    /// Count labels missing from the yarn master list, costed at zero.
    pub unresolved_counts: Vec<String>,
}

impl CostingResult {
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved_counts.is_empty()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs all seven stages.
///
/// Unknown count labels do not fail the run; they weigh nothing and are
/// listed in [`CostingResult::unresolved_counts`].
///
/// ## Errors
/// Only internal invariant failures ([`crate::CoreError::LotWeightMismatch`]),
/// which cannot happen for weights produced here.
pub fn compute_costing(request: &CostingRequest, catalog: &YarnCatalog) -> CoreResult<CostingResult> {
    let mut unresolved = Vec::new();

    // Stage 1
    let warp_kg = lot_weights(request.width, &request.warps, catalog, &mut unresolved);
    let weft_kg = lot_weights(request.width, &request.wefts, catalog, &mut unresolved);

    // Stage 2
    let warp_cost = Money::round_from(aggregate(&request.warps, &warp_kg)?);
    let weft_cost = Money::round_from(aggregate(&request.wefts, &weft_kg)?);
    let material_cost = warp_cost + weft_cost;

    // Stage 3
    let processing_cost = request.processing_cost();

    // Stages 4-7
    let totals = apply_profit_and_gst(material_cost + processing_cost, request.profit_rate);

    Ok(CostingResult {
        total_warp_weight: round_weight(warp_kg.iter().sum()),
        total_weft_weight: round_weight(weft_kg.iter().sum()),
        warp_weights: warp_kg.into_iter().map(round_weight).collect(),
        weft_weights: weft_kg.into_iter().map(round_weight).collect(),
        warp_cost,
        weft_cost,
        material_cost,
        processing_cost,
        profit: totals.profit,
        subtotal: totals.subtotal,
        gst: totals.gst,
        final_total: totals.final_total,
        unresolved_counts: unresolved,
    })
}

/// Unrounded warp and weft weight totals in kg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionWeights {
    pub warp: f64,
    pub weft: f64,
}

/// Sums the full-precision lot weights of each direction.
///
/// Pattern weight splits start from these, since the totals in
/// [`CostingResult`] are already rounded to 3 decimals and a split scaled
/// by the order width would magnify that rounding.
pub fn direction_weights(request: &CostingRequest, catalog: &YarnCatalog) -> DirectionWeights {
    let mut unresolved = Vec::new();
    DirectionWeights {
        warp: lot_weights(request.width, &request.warps, catalog, &mut unresolved).iter().sum(),
        weft: lot_weights(request.width, &request.wefts, catalog, &mut unresolved).iter().sum(),
    }
}

/// Full-precision weight of every lot, collecting unknown labels.
fn lot_weights(
    width: f64,
    lots: &[Lot],
    catalog: &YarnCatalog,
    unresolved: &mut Vec<String>,
) -> Vec<f64> {
    lots.iter()
        .map(|lot| {
            let yarn = catalog.lookup(&lot.count_label);
            let label = lot.count_label.trim();
            if !yarn.resolved && !label.is_empty() && !unresolved.iter().any(|l| l == label) {
                unresolved.push(label.to_string());
            }
            compute_weight(width, lot.reed_or_pick, lot.constant, yarn.hank_weight)
        })
        .collect()
}

/// Stages 4 to 7 on a pre-tax base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitAndTax {
    pub profit: Money,
    pub subtotal: Money,
    pub gst: Money,
    pub final_total: Money,
}

/// Adds profit on `base`, then GST on the subtotal.
///
/// ## Example
/// ```rust
/// use costing_core::pipeline::apply_profit_and_gst;
/// use costing_core::types::Rate;
/// use costing_core::Money;
///
/// let totals = apply_profit_and_gst(Money::from_paise(74721), Rate::from_bps(1500));
/// assert_eq!(totals.profit.paise(), 11208);
/// assert_eq!(totals.subtotal.paise(), 85929);
/// assert_eq!(totals.gst.paise(), 4296);
/// assert_eq!(totals.final_total.paise(), 90225);
/// ```
pub fn apply_profit_and_gst(base: Money, profit_rate: Rate) -> ProfitAndTax {
    let profit = base.apply_rate(profit_rate);
    let subtotal = base + profit;
    let gst = gst_on(subtotal);
    ProfitAndTax {
        profit,
        subtotal,
        gst,
        final_total: subtotal + gst,
    }
}

/// GST on a subtotal, rounded to the nearest paisa.
#[inline]
pub fn gst_on(subtotal: Money) -> Money {
    subtotal.apply_rate(GST_RATE)
}

// =============================================================================
// Finalized Design
// =============================================================================

/// Identity of a design being saved. Supplied by the caller so the
/// pipeline never reads a clock or generates IDs.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMeta {
    pub id: String,
    pub design_name: String,
    pub design_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Assembles the persisted record from a request and its result.
///
/// The design starts out `Pending` and without pattern reports.
pub fn finalize_design(meta: DesignMeta, request: &CostingRequest, result: &CostingResult) -> DesignCosting {
    let with_weights = |lots: &[Lot], weights: &[f64]| -> Vec<DesignLot> {
        lots.iter()
            .zip(weights)
            .map(|(lot, weight)| DesignLot {
                lot: lot.clone(),
                weight: *weight,
            })
            .collect()
    };

    DesignCosting {
        id: meta.id,
        design_name: meta.design_name,
        design_date: meta.design_date,
        width: request.width,
        warps: with_weights(&request.warps, &result.warp_weights),
        wefts: with_weights(&request.wefts, &result.weft_weights),
        warp_cost: result.warp_cost,
        weft_cost: result.weft_cost,
        weaving_cost: request.weaving_cost,
        washing_cost: request.washing_cost,
        mending_cost: request.mending_cost,
        twisting_cost: request.twisting_cost,
        transport_cost: request.transport_cost,
        profit_percent: request.profit_rate.fraction(),
        profit: result.profit,
        subtotal: result.subtotal,
        gst: result.gst,
        final_total: result.final_total,
        status: DesignStatus::Pending,
        warp_pattern: None,
        weft_pattern: None,
        created_at: meta.created_at,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YarnCount;
    use proptest::prelude::*;

    fn catalog() -> YarnCatalog {
        YarnCatalog::from_iter([YarnCount::new("40s", 0.4, 250.0)])
    }

    fn request() -> CostingRequest {
        CostingRequest {
            width: 50.0,
            warps: vec![Lot::new("40s", 100.0, 100.0, 20.0, 1.35)],
            wefts: vec![Lot::new("40s", 80.0, 90.0, 15.0, 1.35)],
            weaving_cost: Money::from_paise(4575),
            washing_cost: Money::from_paise(1250),
            mending_cost: Money::from_paise(825),
            twisting_cost: Money::zero(),
            transport_cost: Money::from_paise(2500),
            profit_rate: Rate::from_bps(1500),
        }
    }

    #[test]
    fn test_stage_values() {
        let result = compute_costing(&request(), &catalog()).unwrap();

        assert_eq!(result.warp_weights, vec![3.214]);
        assert_eq!(result.weft_weights, vec![2.571]);
        assert_eq!(result.warp_cost.paise(), 38571);
        assert_eq!(result.weft_cost.paise(), 27000);
        assert_eq!(result.material_cost.paise(), 65571);
        assert_eq!(result.processing_cost.paise(), 9150);
        assert_eq!(result.profit.paise(), 11208);
        assert_eq!(result.subtotal.paise(), 85929);
        assert_eq!(result.gst.paise(), 4296);
        assert_eq!(result.final_total.paise(), 90225);
        assert!(!result.has_unresolved());
    }

    #[test]
    fn test_no_lots_costs_processing_only() {
        let mut request = request();
        request.warps.clear();
        request.wefts.clear();

        let result = compute_costing(&request, &catalog()).unwrap();
        assert!(result.material_cost.is_zero());
        assert_eq!(result.total_warp_weight, 0.0);
        // 9150 + 1373 profit = 10523, GST 526
        assert_eq!(result.profit.paise(), 1373);
        assert_eq!(result.final_total.paise(), 11049);
    }

    #[test]
    fn test_unknown_count_is_reported_not_fatal() {
        let mut request = request();
        request.warps.push(Lot::new("80s", 100.0, 300.0, 20.0, 1.45));
        request.wefts.push(Lot::new("80s", 80.0, 300.0, 20.0, 1.35));

        let result = compute_costing(&request, &catalog()).unwrap();
        assert_eq!(result.unresolved_counts, vec!["80s".to_string()]);
        assert_eq!(result.warp_weights, vec![3.214, 0.0]);
        // Zero weight means zero contribution
        assert_eq!(result.final_total.paise(), 90225);
    }

    #[test]
    fn test_multiple_lots_accumulate_unrounded() {
        let mut request = request();
        request.warps.push(Lot::new("40s", 100.0, 100.0, 20.0, 1.35));

        let result = compute_costing(&request, &catalog()).unwrap();
        // 2 × 385.714285… = 771.43, not 2 × 385.71
        assert_eq!(result.warp_cost.paise(), 77143);
        assert_eq!(result.total_warp_weight, 6.429);
    }

    #[test]
    fn test_direction_weights_are_unrounded() {
        let mut request = request();
        request.warps.push(Lot::new("80s", 100.0, 300.0, 20.0, 1.45));

        let weights = direction_weights(&request, &catalog());
        // 50 × 100 × 1.35 / 840 × 0.4 = 3.2142857…
        assert!((weights.warp - 22.5 / 7.0).abs() < 1e-12);
        assert!((weights.weft - 18.0 / 7.0).abs() < 1e-12);

        let result = compute_costing(&request, &catalog()).unwrap();
        assert_eq!(result.total_warp_weight, 3.214);
        assert!(weights.warp != result.total_warp_weight);
    }

    #[test]
    fn test_recomputes_after_input_change() {
        let catalog = catalog();
        let mut request = request();
        let before = compute_costing(&request, &catalog).unwrap();

        request.width = 60.0;
        let after = compute_costing(&request, &catalog).unwrap();
        assert!(after.warp_cost > before.warp_cost);
        assert!(after.final_total > before.final_total);

        // Same input, same output
        assert_eq!(after, compute_costing(&request, &catalog).unwrap());
    }

    #[test]
    fn test_finalize_design() {
        let request = request();
        let result = compute_costing(&request, &catalog()).unwrap();
        let meta = DesignMeta {
            id: "d-1".to_string(),
            design_name: "Check 42".to_string(),
            design_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
        };

        let design = finalize_design(meta, &request, &result);
        assert_eq!(design.status, DesignStatus::Pending);
        assert_eq!(design.warps[0].weight, 3.214);
        assert_eq!(design.wefts[0].lot.count_label, "40s");
        assert!((design.profit_percent - 0.15).abs() < 1e-12);
        assert_eq!(design.material_cost(), result.material_cost);
        assert_eq!(design.processing_cost(), result.processing_cost);
        assert_eq!(design.final_total.paise(), 90225);
    }

    proptest! {
        #[test]
        fn prop_gst_is_five_percent_rounded(subtotal in 0i64..10_000_000_000) {
            let gst = gst_on(Money::from_paise(subtotal)).paise();
            // gst = round_half_up(subtotal / 20)
            prop_assert!(20 * gst <= subtotal + 10);
            prop_assert!(subtotal + 10 < 20 * gst + 20);
        }

        #[test]
        fn prop_higher_profit_means_higher_total(
            base in 10_000i64..100_000_000,
            bps in 0u32..9_000,
            step in 100u32..1_000,
        ) {
            let base = Money::from_paise(base);
            let low = apply_profit_and_gst(base, Rate::from_bps(bps));
            let high = apply_profit_and_gst(base, Rate::from_bps(bps + step));
            prop_assert!(high.final_total > low.final_total);
        }
    }
}

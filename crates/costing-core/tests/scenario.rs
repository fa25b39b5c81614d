//! End-to-end costing of a single-warp, single-weft design, from raw form
//! input to a finalized record with a warp pattern report.

use chrono::{NaiveDate, TimeZone, Utc};
use costing_core::aggregate::aggregate;
use costing_core::numeric::round_weight;
use costing_core::pattern::{build_report, PatternRequest};
use costing_core::pipeline::{compute_costing, finalize_design, DesignMeta};
use costing_core::validation::{DesignForm, LotInput};
use costing_core::weight::compute_weight;
use costing_core::yarn::{sort_count_labels, YarnCatalog};
use costing_core::{CostingDefaults, DesignStatus, PatternSegment, YarnCount};

fn catalog() -> YarnCatalog {
    YarnCatalog::from_iter([
        YarnCount::new("40s", 0.4, 250.0),
        YarnCount::new("2/40s", 0.2, 310.0),
        YarnCount::new("20s", 0.8, 180.0),
    ])
}

fn form() -> DesignForm {
    serde_json::from_str(
        r#"{
            "design_name": "Oxford Check",
            "design_date": "2024-03-01",
            "width": "50",
            "warps": [
                { "count": "40s", "reed": "100", "cost_per_unit": "100", "dyeing_cost_per_unit": "20", "constant": "1.35" }
            ],
            "wefts": [
                { "count": "40s", "pick": "80", "cost_per_unit": "90", "dyeing_cost_per_unit": "15", "constant": "1.35" }
            ],
            "weaving_cost": "45.75",
            "washing_cost": "12.5",
            "mending_cost": "8.25",
            "twisting_cost": "0",
            "transport_cost": "25",
            "profit_percent": "15"
        }"#,
    )
    .unwrap()
}

#[test]
fn scenario_matches_hand_computed_values() {
    let submission = form()
        .submission(&CostingDefaults::default(), &catalog())
        .unwrap();
    let result = compute_costing(&submission.request, &catalog()).unwrap();

    // 50 × 100 × 1.35 / 840 × 0.4 = 3.2142857…
    assert_eq!(result.warp_weights, vec![3.214]);
    // 50 × 80 × 1.35 / 840 × 0.4 = 2.5714285…
    assert_eq!(result.weft_weights, vec![2.571]);
    // 120 × 3.2142857… = 385.714…
    assert_eq!(result.warp_cost.to_string(), "₹385.71");
    // 105 × 2.5714285… = 270.00
    assert_eq!(result.weft_cost.to_string(), "₹270.00");
    // 45.75 + 12.50 + 8.25 + 0 + 25.00
    assert_eq!(result.processing_cost.to_string(), "₹91.50");
    // 15% of 747.21 = 112.0815
    assert_eq!(result.profit.to_string(), "₹112.08");
    assert_eq!(result.subtotal.to_string(), "₹859.29");
    // 5% of 859.29 = 42.9645
    assert_eq!(result.gst.to_string(), "₹42.96");
    assert_eq!(result.final_total.to_string(), "₹902.25");
    assert!(result.unresolved_counts.is_empty());
}

#[test]
fn weight_formula_worked_example() {
    // (54 × 120 × 1.45 / 840) × 0.5
    assert_eq!(round_weight(compute_weight(54.0, 120.0, 1.45, 0.5)), 5.593);
}

#[test]
fn aggregate_of_nothing_is_zero() {
    assert_eq!(aggregate(&[], &[]).unwrap(), 0.0);
}

#[test]
fn raising_profit_raises_final_total() {
    let catalog = catalog();
    let mut previous = None;

    for pct in ["0", "5", "15", "30", "100"] {
        let mut form = form();
        form.profit_percent = Some(pct.into());
        let request = form.to_request(&CostingDefaults::default(), &catalog);
        let total = compute_costing(&request, &catalog).unwrap().final_total;

        if let Some(previous) = previous {
            assert!(total > previous, "{pct}% did not raise the total");
        }
        previous = Some(total);
    }
}

#[test]
fn count_labels_sort_for_dropdowns() {
    assert_eq!(
        sort_count_labels(["40s", "20s", "2/40s", "1/60s"]),
        vec!["20s", "40s", "1/60s", "2/40s"]
    );
    assert_eq!(catalog().sorted_labels(), vec!["20s", "40s", "2/40s"]);
}

#[test]
fn finalized_design_carries_pattern_report() {
    let catalog = catalog();
    let mut form = form();
    form.warps.push(LotInput {
        count: Some("2/40s".to_string()),
        reed_or_pick: Some("100".into()),
        cost_per_unit: Some("310".into()),
        dyeing_cost_per_unit: Some("0".into()),
        constant: None,
    });

    let submission = form.submission(&CostingDefaults::default(), &catalog).unwrap();
    let result = compute_costing(&submission.request, &catalog).unwrap();

    let segments = vec![
        PatternSegment::new("Navy", 24),
        PatternSegment::new("White", 8),
        PatternSegment::new("Navy", 4),
    ];
    let warp_pattern = build_report(&PatternRequest::for_fabric(
        submission.request.width,
        100.0,
        segments,
        result.total_warp_weight,
        2.0,
    ))
    .unwrap();

    // 5000 threads: 138 × 36 = 4968, then Navy 24 → 4992, White 8 → 5000
    assert_eq!(warp_pattern.repeat_info.full_repeat_count, 138);
    assert_eq!(warp_pattern.repeat_info.truncation_color, "White");
    assert_eq!(warp_pattern.repeat_info.remainder_difference, 0);
    let threads: u32 = warp_pattern
        .final_thread_summary
        .iter()
        .map(|c| c.final_count)
        .sum();
    assert_eq!(threads, 5000);

    let meta = DesignMeta {
        id: "3f7c1c1e-0000-4000-8000-000000000001".to_string(),
        design_name: submission.design_name.clone(),
        design_date: submission.design_date,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    };
    let mut design = finalize_design(meta, &submission.request, &result);
    design.warp_pattern = Some(warp_pattern);

    assert_eq!(design.design_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(design.status, DesignStatus::Pending);
    assert_eq!(design.warps.len(), 2);
    // Blank constant on a warp row takes the warp default
    assert_eq!(design.warps[1].lot.constant, 1.45);
    assert_eq!(design.material_cost(), result.material_cost);
}

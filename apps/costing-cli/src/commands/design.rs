//! # Design Commands
//!
//! Costing preview, submission and the design list.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Design Submission Flow                               │
//! │                                                                         │
//! │  form.json ──► DesignForm                                              │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  validate_design_form ──── bad field? ──► VALIDATION_ERROR (field)     │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  yarns().catalog()        one snapshot of the master list              │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  compute_costing          weights → costs → profit → GST → final       │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  build_report (optional)  warp / weft pattern sessions                 │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  designs().insert ──────── name taken? ──► CONFLICT                    │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  DesignCosting (pending)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The preview (`cost`) runs the same pipeline on unvalidated input and
//! never touches the design table.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::pattern::{FabricContext, PatternInput};
use crate::error::{ApiError, ApiResult};
use crate::state::{AppConfig, AppState};
use costing_core::pattern::build_report;
use costing_core::pipeline::{
    compute_costing, direction_weights, finalize_design, CostingResult, DesignMeta,
};
use costing_core::validation::DesignForm;
use costing_core::{DesignCosting, DesignStatus};
use costing_db::DesignSummary;

// =============================================================================
// Preview
// =============================================================================

/// Formatted figures of a costing run, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDisplay {
    pub total_warp_weight: String,
    pub total_weft_weight: String,
    pub warp_cost: String,
    pub weft_cost: String,
    pub material_cost: String,
    pub processing_cost: String,
    pub profit: String,
    pub subtotal: String,
    pub gst: String,
    pub final_total: String,
}

impl CostDisplay {
    fn new(config: &AppConfig, result: &CostingResult) -> Self {
        let money = |m| config.format_currency(m);
        CostDisplay {
            total_warp_weight: config.format_weight(result.total_warp_weight),
            total_weft_weight: config.format_weight(result.total_weft_weight),
            warp_cost: money(result.warp_cost),
            weft_cost: money(result.weft_cost),
            material_cost: money(result.material_cost),
            processing_cost: money(result.processing_cost),
            profit: money(result.profit),
            subtotal: money(result.subtotal),
            gst: money(result.gst),
            final_total: money(result.final_total),
        }
    }
}

/// Result of `cost`.
#[derive(Debug, Clone, Serialize)]
pub struct CostingPreview {
    #[serde(flatten)]
    pub result: CostingResult,
    pub display: CostDisplay,
}

/// Computes a costing without saving anything.
///
/// Blank or malformed numbers count as 0 so a half-filled form still
/// previews.
pub async fn cost_design(state: &AppState, form: &DesignForm) -> ApiResult<CostingPreview> {
    let catalog = state.db().yarns().catalog().await?;
    let request = form.to_request(&state.config().defaults, &catalog);
    let result = compute_costing(&request, &catalog)?;

    warn_unresolved(&result);
    Ok(CostingPreview {
        display: CostDisplay::new(state.config(), &result),
        result,
    })
}

fn warn_unresolved(result: &CostingResult) {
    if result.has_unresolved() {
        warn!(
            counts = ?result.unresolved_counts,
            "Count labels missing from the yarn master list were costed at zero"
        );
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Validates, computes and saves a design.
///
/// ## Errors
/// * `VALIDATION_ERROR` - a form field, with its path
/// * `COMPUTATION_ERROR` - a pattern whose repeat has no threads
/// * `CONFLICT` - the design name is taken
pub async fn submit_design(
    state: &AppState,
    form: &DesignForm,
    warp_pattern: Option<&PatternInput>,
    weft_pattern: Option<&PatternInput>,
) -> ApiResult<DesignCosting> {
    let catalog = state.db().yarns().catalog().await?;
    let submission = form.submission(&state.config().defaults, &catalog)?;
    let result = compute_costing(&submission.request, &catalog)?;
    warn_unresolved(&result);

    let request = &submission.request;
    let weights = direction_weights(request, &catalog);
    let warp_context = FabricContext {
        width: Some(request.width),
        reed_or_pick: request.warps.first().map(|lot| lot.reed_or_pick),
        total_weight: Some(weights.warp),
    };
    let weft_context = FabricContext {
        width: Some(request.width),
        reed_or_pick: request.wefts.first().map(|lot| lot.reed_or_pick),
        total_weight: Some(weights.weft),
    };

    let warp_report = match warp_pattern {
        Some(input) => Some(build_report(&input.to_request(warp_context)?)?),
        None => None,
    };
    let weft_report = match weft_pattern {
        Some(input) => Some(build_report(&input.to_request(weft_context)?)?),
        None => None,
    };

    let meta = DesignMeta {
        id: Uuid::new_v4().to_string(),
        design_name: submission.design_name.clone(),
        design_date: submission.design_date,
        created_at: Utc::now(),
    };
    let mut design = finalize_design(meta, request, &result);
    design.warp_pattern = warp_report;
    design.weft_pattern = weft_report;

    state.db().designs().insert(&design).await?;
    info!(
        id = %design.id,
        design_name = %design.design_name,
        final_total = %design.final_total,
        "Design submitted"
    );

    Ok(design)
}

// =============================================================================
// Design List
// =============================================================================

/// Lists designs, newest first.
pub async fn list_designs(
    state: &AppState,
    status: Option<DesignStatus>,
) -> ApiResult<Vec<DesignSummary>> {
    Ok(state.db().designs().list(status).await?)
}

/// Finds a design by ID, falling back to its name.
pub async fn show_design(state: &AppState, key: &str) -> ApiResult<DesignCosting> {
    let designs = state.db().designs();
    if let Some(design) = designs.get_by_id(key).await? {
        return Ok(design);
    }

    designs
        .get_by_name(key)
        .await?
        .ok_or_else(|| ApiError::not_found("Design", key))
}

/// Marks a pending design completed.
pub async fn complete_design(state: &AppState, key: &str) -> ApiResult<DesignCosting> {
    let design = show_design(state, key).await?;
    state
        .db()
        .designs()
        .update_status(&design.id, DesignStatus::Completed)
        .await?;

    info!(id = %design.id, "Design completed");
    Ok(DesignCosting {
        status: DesignStatus::Completed,
        ..design
    })
}

/// Result of `design delete`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignDeleted {
    pub id: String,
    pub design_name: String,
}

/// Deletes a design and its lot lines.
pub async fn delete_design(state: &AppState, key: &str) -> ApiResult<DesignDeleted> {
    let design = show_design(state, key).await?;
    state.db().designs().delete(&design.id).await?;

    info!(id = %design.id, design_name = %design.design_name, "Design deleted");
    Ok(DesignDeleted {
        id: design.id,
        design_name: design.design_name,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

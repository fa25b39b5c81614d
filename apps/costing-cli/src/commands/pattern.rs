//! # Pattern Commands
//!
//! Warp/weft color pattern sessions.
//!
//! ## Input File
//! ```json
//! {
//!   "width": 50, "reed_or_pick": 100,
//!   "segments": [ { "color": "Navy", "thread_count": 24 },
//!                 { "color": "White", "thread_count": 12 } ],
//!   "total_weight": 3.214,
//!   "total_order_width": 1.0
//! }
//! ```
//! `target_thread_count` may be given directly instead of width and
//! reed/pick. When a pattern is attached to a submitted design, the
//! design supplies width, density and total weight for missing keys.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;
use costing_core::pattern::{build_report, PatternReport, PatternRequest};
use costing_core::validation::{validate_color_legend, validate_segments};
use costing_core::{ColorLegendEntry, PatternSegment, ValidationError};

/// A pattern session as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatternInput {
    pub target_thread_count: Option<u32>,
    pub width: Option<f64>,
    pub reed_or_pick: Option<f64>,
    pub segments: Vec<PatternSegment>,
    pub total_weight: Option<f64>,
    pub total_order_width: Option<f64>,
}

/// Values a design contributes to a pattern session.
#[derive(Debug, Clone, Copy, Default)]
pub struct FabricContext {
    pub width: Option<f64>,
    pub reed_or_pick: Option<f64>,
    pub total_weight: Option<f64>,
}

impl PatternInput {
    /// Builds the engine request. Keys in the file win over `context`.
    pub fn to_request(&self, context: FabricContext) -> ApiResult<PatternRequest> {
        validate_segments(&self.segments)?;

        let total_weight = self.total_weight.or(context.total_weight).unwrap_or(0.0);
        let total_order_width = self.total_order_width.unwrap_or(1.0);

        if let Some(target) = self.target_thread_count {
            return Ok(PatternRequest {
                target_thread_count: target,
                segments: self.segments.clone(),
                total_weight,
                total_order_width,
            });
        }

        let width = self.width.or(context.width);
        let reed_or_pick = self.reed_or_pick.or(context.reed_or_pick);
        match (width, reed_or_pick) {
            (Some(width), Some(reed_or_pick)) => Ok(PatternRequest::for_fabric(
                width,
                reed_or_pick,
                self.segments.clone(),
                total_weight,
                total_order_width,
            )),
            _ => Err(ValidationError::Required {
                field: "target_thread_count".to_string(),
            }
            .into()),
        }
    }
}

/// Report plus the legend entries of the colors it uses.
#[derive(Debug, Clone, Serialize)]
pub struct PatternResponse {
    #[serde(flatten)]
    pub report: PatternReport,
    pub legend: Vec<ColorLegendEntry>,
    /// Colors of the repeat that have no legend entry.
    pub unlisted_colors: Vec<String>,
}

/// Runs the repeat engine for one direction.
pub async fn run_pattern(state: &AppState, input: &PatternInput) -> ApiResult<PatternResponse> {
    let request = input.to_request(FabricContext::default())?;

    let legend = state.db().color_legend().list().await?;
    validate_color_legend(&legend)?;

    let report = build_report(&request)?;
    debug!(
        target_threads = report.target_thread_count,
        repeats = report.repeat_info.full_repeat_count,
        "Pattern report built"
    );

    let (used, unlisted) = legend_for(&report, legend);
    Ok(PatternResponse {
        report,
        legend: used,
        unlisted_colors: unlisted,
    })
}

/// Splits the legend into entries the report uses and report colors the
/// legend lacks.
fn legend_for(
    report: &PatternReport,
    legend: Vec<ColorLegendEntry>,
) -> (Vec<ColorLegendEntry>, Vec<String>) {
    let colors: Vec<&str> = report
        .final_thread_summary
        .iter()
        .map(|c| c.color.as_str())
        .collect();

    let unlisted = colors
        .iter()
        .filter(|color| !legend.iter().any(|e| e.color.trim() == color.trim()))
        .map(|color| color.to_string())
        .collect();
    let used = legend
        .into_iter()
        .filter(|e| colors.iter().any(|color| e.color.trim() == color.trim()))
        .collect();

    (used, unlisted)
}

//! # Validation Module
//!
//! Form validation before a design is submitted, and the conversion from raw
//! form fields to a typed [`CostingRequest`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Live preview                                                 │
//! │  ├── No validation at all                                              │
//! │  └── Blank / garbage numbers coerce to 0 (numeric::to_number)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission (THIS MODULE)                                     │
//! │  ├── Required fields per lot and per design                            │
//! │  └── Field-level errors, no partial submission                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE design_name → conflict                                     │
//! │  └── Foreign keys, cascade delete of lot lines                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use costing_core::validation::{validate_design_form, DesignForm};
//!
//! let form = DesignForm::default();
//! let err = validate_design_form(&form).unwrap_err();
//! assert_eq!(err.field(), "design_name");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::defaults::CostingDefaults;
use crate::error::ValidationError;
use crate::money::Money;
use crate::numeric::to_number;
use crate::pipeline::CostingRequest;
use crate::types::{ColorLegendEntry, Lot, LotKind, PatternSegment, Rate};
use crate::yarn::YarnCatalog;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a design name.
pub const MAX_DESIGN_NAME_LEN: usize = 100;

/// Maximum length of a yarn count label.
pub const MAX_COUNT_LABEL_LEN: usize = 20;

/// Date format of the design date field.
pub const DESIGN_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Form Values
// =============================================================================

/// A raw form field: whatever the user typed, or a number from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Coerced value; see [`crate::numeric::to_number`].
    pub fn number(&self) -> f64 {
        match self {
            FormValue::Number(n) if n.is_finite() => *n,
            FormValue::Number(_) => 0.0,
            FormValue::Text(text) => to_number(text),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(text) if text.trim().is_empty())
    }

    /// Whether the whole field is a finite number (not just a prefix).
    fn is_strict_number(&self) -> bool {
        match self {
            FormValue::Number(n) => n.is_finite(),
            FormValue::Text(text) => text.trim().parse::<f64>().map_or(false, f64::is_finite),
        }
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_string())
    }
}

fn number(field: &Option<FormValue>) -> f64 {
    field.as_ref().map_or(0.0, FormValue::number)
}

fn blank(field: &Option<FormValue>) -> bool {
    field.as_ref().map_or(true, FormValue::is_blank)
}

/// Number of the field, or `fallback` when the field is blank.
fn number_or(field: &Option<FormValue>, fallback: f64) -> f64 {
    if blank(field) {
        fallback
    } else {
        number(field)
    }
}

/// Money value of the field, or `fallback` when the field is blank.
fn money_or(field: &Option<FormValue>, fallback: Money) -> Money {
    if blank(field) {
        fallback
    } else {
        Money::round_from(number(field))
    }
}

// =============================================================================
// Forms
// =============================================================================

/// One warp or weft row of the costing form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct LotInput {
    pub count: Option<String>,
    /// Reed for warps, pick for wefts.
    #[serde(alias = "reed", alias = "pick")]
    pub reed_or_pick: Option<FormValue>,
    pub cost_per_unit: Option<FormValue>,
    pub dyeing_cost_per_unit: Option<FormValue>,
    /// Blank means the configured default for the direction.
    pub constant: Option<FormValue>,
}

impl LotInput {
    /// Typed lot. A blank cost falls back to the yarn's master price.
    pub fn to_lot(&self, kind: LotKind, defaults: &CostingDefaults, catalog: &YarnCatalog) -> Lot {
        let label = self.count.as_deref().unwrap_or("").trim().to_string();
        let master_price = catalog.lookup(&label).unit_price;

        Lot {
            reed_or_pick: number(&self.reed_or_pick),
            cost_per_unit: number_or(&self.cost_per_unit, master_price),
            dyeing_cost_per_unit: number(&self.dyeing_cost_per_unit),
            constant: number_or(&self.constant, defaults.constant_for(kind)),
            count_label: label,
        }
    }
}

/// The costing form as submitted.
///
/// Every numeric field is raw input. Deserializing never fails on a bad
/// number; [`validate_design_form`] reports it with its field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct DesignForm {
    pub design_name: Option<String>,
    /// `YYYY-MM-DD`.
    pub design_date: Option<String>,
    pub width: Option<FormValue>,
    pub warps: Vec<LotInput>,
    pub wefts: Vec<LotInput>,
    pub weaving_cost: Option<FormValue>,
    pub washing_cost: Option<FormValue>,
    pub mending_cost: Option<FormValue>,
    pub twisting_cost: Option<FormValue>,
    pub transport_cost: Option<FormValue>,
    /// 0-100 percentage.
    pub profit_percent: Option<FormValue>,
}

/// A validated submission, ready for the pipeline and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub design_name: String,
    pub design_date: NaiveDate,
    pub request: CostingRequest,
}

impl DesignForm {
    /// Typed request for the pipeline. Never fails.
    ///
    /// Blank optional fields take their configured default; anything else
    /// that is blank or not a number counts as 0. Used as is for the live
    /// preview, and after [`validate_design_form`] for submission.
    pub fn to_request(&self, defaults: &CostingDefaults, catalog: &YarnCatalog) -> CostingRequest {
        let profit_rate = if blank(&self.profit_percent) {
            defaults.profit_rate()
        } else {
            Rate::from_percentage(number(&self.profit_percent))
        };

        CostingRequest {
            width: number(&self.width),
            warps: self
                .warps
                .iter()
                .map(|lot| lot.to_lot(LotKind::Warp, defaults, catalog))
                .collect(),
            wefts: self
                .wefts
                .iter()
                .map(|lot| lot.to_lot(LotKind::Weft, defaults, catalog))
                .collect(),
            weaving_cost: Money::round_from(number(&self.weaving_cost)),
            washing_cost: money_or(&self.washing_cost, defaults.washing()),
            mending_cost: money_or(&self.mending_cost, defaults.mending()),
            twisting_cost: money_or(&self.twisting_cost, defaults.twisting()),
            transport_cost: money_or(&self.transport_cost, defaults.transport()),
            profit_rate,
        }
    }

    /// Validates, then converts.
    pub fn submission(
        &self,
        defaults: &CostingDefaults,
        catalog: &YarnCatalog,
    ) -> ValidationResult<Submission> {
        validate_design_form(self)?;
        Ok(Submission {
            design_name: validate_design_name(self.design_name.as_deref().unwrap_or(""))?,
            design_date: parse_design_date(self.design_date.as_deref().unwrap_or(""))?,
            request: self.to_request(defaults, catalog),
        })
    }
}

// =============================================================================
// Design Form Validation
// =============================================================================

/// Validates a design form, stopping at the first problem.
///
/// ## Rules
/// - `design_name` and `design_date` required
/// - `width` required
/// - Each warp: count, reed, cost, dyeing required
/// - Each weft: count, pick, cost, dyeing required
/// - Weaving, washing and transport cost required
/// - Numbers must be numbers and not negative; profit within 0-100
pub fn validate_design_form(form: &DesignForm) -> ValidationResult<()> {
    match design_form_errors(form).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every problem of a design form, in form order.
pub fn design_form_errors(form: &DesignForm) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(err) = validate_design_name(form.design_name.as_deref().unwrap_or("")) {
        errors.push(err);
    }
    if let Err(err) = parse_design_date(form.design_date.as_deref().unwrap_or("")) {
        errors.push(err);
    }

    check_number(&mut errors, "width", &form.width, true);

    for (kind, lots) in [(LotKind::Warp, &form.warps), (LotKind::Weft, &form.wefts)] {
        for (index, lot) in lots.iter().enumerate() {
            lot_errors(&mut errors, kind, index, lot);
        }
    }

    check_number(&mut errors, "weaving_cost", &form.weaving_cost, true);
    check_number(&mut errors, "washing_cost", &form.washing_cost, true);
    check_number(&mut errors, "mending_cost", &form.mending_cost, false);
    check_number(&mut errors, "twisting_cost", &form.twisting_cost, false);
    check_number(&mut errors, "transport_cost", &form.transport_cost, true);

    if check_number(&mut errors, "profit_percent", &form.profit_percent, false) {
        let percent = number(&form.profit_percent);
        let bps = percent * 100.0;
        if percent > 100.0 {
            errors.push(ValidationError::OutOfRange {
                field: "profit_percent".to_string(),
                min: 0,
                max: 100,
            });
        } else if (bps - bps.round()).abs() > 1e-6 {
            // Rates are held in basis points
            errors.push(ValidationError::InvalidFormat {
                field: "profit_percent".to_string(),
                reason: "at most 2 decimal places".to_string(),
            });
        }
    }

    errors
}

fn lot_errors(errors: &mut Vec<ValidationError>, kind: LotKind, index: usize, lot: &LotInput) {
    let prefix = match kind {
        LotKind::Warp => format!("warps[{index}]"),
        LotKind::Weft => format!("wefts[{index}]"),
    };

    if lot.count.as_deref().map_or(true, |c| c.trim().is_empty()) {
        errors.push(ValidationError::Required {
            field: format!("{prefix}.count"),
        });
    }

    let density = format!("{prefix}.{}", kind.density_field());
    check_number(errors, &density, &lot.reed_or_pick, true);
    check_number(errors, &format!("{prefix}.cost_per_unit"), &lot.cost_per_unit, true);
    check_number(
        errors,
        &format!("{prefix}.dyeing_cost_per_unit"),
        &lot.dyeing_cost_per_unit,
        true,
    );
    check_number(errors, &format!("{prefix}.constant"), &lot.constant, false);
}

/// Pushes at most one error for a numeric field. Returns `true` when the
/// field holds a usable, non-negative number.
fn check_number(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: &Option<FormValue>,
    required: bool,
) -> bool {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => {
            if required {
                errors.push(ValidationError::Required {
                    field: field.to_string(),
                });
            }
            return false;
        }
    };

    if !value.is_strict_number() {
        errors.push(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number".to_string(),
        });
        return false;
    }

    if value.number() < 0.0 {
        errors.push(ValidationError::Negative {
            field: field.to_string(),
        });
        return false;
    }

    true
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a design name.
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use costing_core::validation::validate_design_name;
///
/// assert_eq!(validate_design_name("  Check 42 ").unwrap(), "Check 42");
/// assert!(validate_design_name("").is_err());
/// ```
pub fn validate_design_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "design_name".to_string(),
        });
    }

    if name.chars().count() > MAX_DESIGN_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "design_name".to_string(),
            max: MAX_DESIGN_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Parses a `YYYY-MM-DD` design date.
pub fn parse_design_date(date: &str) -> ValidationResult<NaiveDate> {
    let date = date.trim();

    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "design_date".to_string(),
        });
    }

    NaiveDate::parse_from_str(date, DESIGN_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "design_date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// Validates a yarn master entry before it is saved.
pub fn validate_yarn_count(label: &str, hank_weight: f64, unit_price: f64) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "label".to_string(),
        });
    }

    if label.chars().count() > MAX_COUNT_LABEL_LEN {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: MAX_COUNT_LABEL_LEN,
        });
    }

    for (field, value) in [("hank_weight", hank_weight), ("unit_price", unit_price)] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be a number".to_string(),
            });
        }
        if value < 0.0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Pattern Session Validators
// =============================================================================

/// Validates a color legend before a pattern session uses it.
///
/// ## Rules
/// - Every entry needs a color
/// - Colors are unique
/// - Serial numbers are unique
///
/// ## Example
/// ```rust
/// use costing_core::types::ColorLegendEntry;
/// use costing_core::validation::validate_color_legend;
///
/// let legend = vec![
///     ColorLegendEntry { color: "#ff0000".into(), label: "Red".into(), serial_number: 1 },
///     ColorLegendEntry { color: "#0000ff".into(), label: "Blue".into(), serial_number: 1 },
/// ];
/// let err = validate_color_legend(&legend).unwrap_err();
/// assert_eq!(err.field(), "legend[1].serial_number");
/// ```
pub fn validate_color_legend(entries: &[ColorLegendEntry]) -> ValidationResult<()> {
    for (index, entry) in entries.iter().enumerate() {
        let color = entry.color.trim();
        if color.is_empty() {
            return Err(ValidationError::Required {
                field: format!("legend[{index}].color"),
            });
        }

        let earlier = &entries[..index];
        if earlier.iter().any(|e| e.color.trim() == color) {
            return Err(ValidationError::Duplicate {
                field: format!("legend[{index}].color"),
                value: color.to_string(),
            });
        }
        if earlier.iter().any(|e| e.serial_number == entry.serial_number) {
            return Err(ValidationError::Duplicate {
                field: format!("legend[{index}].serial_number"),
                value: entry.serial_number.to_string(),
            });
        }
    }

    Ok(())
}

/// Every segment of a repeat needs a color.
pub fn validate_segments(segments: &[PatternSegment]) -> ValidationResult<()> {
    match segments.iter().position(|s| s.color.trim().is_empty()) {
        Some(index) => Err(ValidationError::Required {
            field: format!("segments[{index}].color"),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YarnCount;

    fn lot(count: &str, density: f64, cost: f64, dyeing: f64) -> LotInput {
        LotInput {
            count: Some(count.to_string()),
            reed_or_pick: Some(density.into()),
            cost_per_unit: Some(cost.into()),
            dyeing_cost_per_unit: Some(dyeing.into()),
            constant: None,
        }
    }

    fn valid_form() -> DesignForm {
        DesignForm {
            design_name: Some("Check 42".to_string()),
            design_date: Some("2024-03-01".to_string()),
            width: Some(50.0.into()),
            warps: vec![lot("40s", 100.0, 100.0, 20.0)],
            wefts: vec![lot("40s", 80.0, 90.0, 15.0)],
            weaving_cost: Some(45.75.into()),
            washing_cost: Some("12.5".into()),
            mending_cost: Some(8.25.into()),
            twisting_cost: None,
            transport_cost: Some(25.0.into()),
            profit_percent: Some(15.0.into()),
        }
    }

    fn fields(form: &DesignForm) -> Vec<String> {
        design_form_errors(form)
            .iter()
            .map(|e| e.field().to_string())
            .collect()
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_design_form(&valid_form()).is_ok());
    }

    #[test]
    fn test_missing_design_fields() {
        let mut form = valid_form();
        form.design_name = Some("   ".to_string());
        form.design_date = None;
        form.weaving_cost = None;
        form.transport_cost = Some("".into());

        assert_eq!(
            fields(&form),
            vec!["design_name", "design_date", "weaving_cost", "transport_cost"]
        );
    }

    #[test]
    fn test_lot_fields_use_direction_names() {
        let mut form = valid_form();
        form.warps[0].reed_or_pick = None;
        form.wefts.push(LotInput::default());

        assert_eq!(
            fields(&form),
            vec![
                "warps[0].reed",
                "wefts[1].count",
                "wefts[1].pick",
                "wefts[1].cost_per_unit",
                "wefts[1].dyeing_cost_per_unit",
            ]
        );
    }

    #[test]
    fn test_mending_and_twisting_are_optional() {
        let mut form = valid_form();
        form.mending_cost = None;
        form.twisting_cost = Some("".into());
        assert!(validate_design_form(&form).is_ok());
    }

    #[test]
    fn test_bad_numbers() {
        let mut form = valid_form();
        form.width = Some("wide".into());
        form.warps[0].cost_per_unit = Some((-5.0).into());
        form.profit_percent = Some(150.0.into());

        let errors = design_form_errors(&form);
        assert!(matches!(&errors[0], ValidationError::InvalidFormat { field, .. } if field == "width"));
        assert!(matches!(&errors[1], ValidationError::Negative { field } if field == "warps[0].cost_per_unit"));
        assert!(matches!(&errors[2], ValidationError::OutOfRange { field, .. } if field == "profit_percent"));
    }

    #[test]
    fn test_profit_percent_resolution() {
        let mut form = valid_form();
        form.profit_percent = Some("15.004".into());
        let err = validate_design_form(&form).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field, .. } if field == "profit_percent"));

        form.profit_percent = Some("15.15".into());
        assert!(validate_design_form(&form).is_ok());
        let request = form.to_request(&CostingDefaults::default(), &YarnCatalog::new());
        assert_eq!(request.profit_rate.bps(), 1515);
    }

    #[test]
    fn test_bad_date() {
        let mut form = valid_form();
        form.design_date = Some("01/03/2024".to_string());
        let err = validate_design_form(&form).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_to_request_applies_defaults() {
        let mut form = valid_form();
        form.washing_cost = None;
        form.transport_cost = None;
        form.profit_percent = None;

        let request = form.to_request(&CostingDefaults::default(), &YarnCatalog::new());
        assert_eq!(request.washing_cost.paise(), 800);
        assert_eq!(request.transport_cost.paise(), 700);
        assert_eq!(request.mending_cost.paise(), 825);
        assert!(request.twisting_cost.is_zero());
        assert_eq!(request.profit_rate.bps(), 1500);
        assert_eq!(request.warps[0].constant, 1.45);
        assert_eq!(request.wefts[0].constant, 1.35);
    }

    #[test]
    fn test_to_request_coerces_garbage_to_zero() {
        let mut form = valid_form();
        form.width = Some("".into());
        form.warps[0].reed_or_pick = Some("n/a".into());

        let request = form.to_request(&CostingDefaults::default(), &YarnCatalog::new());
        assert_eq!(request.width, 0.0);
        assert_eq!(request.warps[0].reed_or_pick, 0.0);
    }

    #[test]
    fn test_blank_cost_uses_master_price() {
        let catalog = YarnCatalog::from_iter([YarnCount::new("40s", 0.4, 250.0)]);
        let mut form = valid_form();
        form.warps[0].cost_per_unit = None;

        let request = form.to_request(&CostingDefaults::default(), &catalog);
        assert_eq!(request.warps[0].cost_per_unit, 250.0);
        assert_eq!(request.wefts[0].cost_per_unit, 90.0);
    }

    #[test]
    fn test_submission() {
        let submission = valid_form()
            .submission(&CostingDefaults::default(), &YarnCatalog::new())
            .unwrap();
        assert_eq!(submission.design_name, "Check 42");
        assert_eq!(submission.design_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(submission.request.washing_cost.paise(), 1250);
    }

    #[test]
    fn test_form_from_json_accepts_text_and_numbers() {
        let form: DesignForm = serde_json::from_str(
            r#"{
                "design_name": "Stripe",
                "width": "54",
                "warps": [{ "count": "2/40s", "reed": 120, "cost_per_unit": "310" }]
            }"#,
        )
        .unwrap();
        assert_eq!(form.width, Some(FormValue::Text("54".to_string())));
        assert_eq!(form.warps[0].reed_or_pick, Some(FormValue::Number(120.0)));
        assert!(form.wefts.is_empty());
    }

    #[test]
    fn test_validate_yarn_count() {
        assert!(validate_yarn_count("40s", 0.4, 250.0).is_ok());
        assert!(validate_yarn_count(" ", 0.4, 250.0).is_err());
        assert!(validate_yarn_count("40s", -0.1, 250.0).is_err());
        assert!(validate_yarn_count("40s", 0.4, f64::NAN).is_err());
    }

    #[test]
    fn test_color_legend_unique_color() {
        let legend = vec![
            ColorLegendEntry { color: "Red".into(), label: "A".into(), serial_number: 1 },
            ColorLegendEntry { color: "Red".into(), label: "B".into(), serial_number: 2 },
        ];
        let err = validate_color_legend(&legend).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { ref field, .. } if field == "legend[1].color"));
        assert!(validate_color_legend(&legend[..1]).is_ok());
    }

    #[test]
    fn test_segments_need_color() {
        let segments = vec![PatternSegment::new("Red", 3), PatternSegment::new(" ", 2)];
        assert_eq!(
            validate_segments(&segments).unwrap_err().field(),
            "segments[1].color"
        );
    }
}

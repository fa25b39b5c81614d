//! # Error Types
//!
//! Domain-specific error types for costing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  costing-core errors (this file)                                       │
//! │  ├── CoreError        - Computation invariants, state transitions      │
//! │  └── ValidationError  - Form fields that fail before any math runs     │
//! │                                                                         │
//! │  costing-db errors (separate crate)                                    │
//! │  └── DbError          - Database failures, duplicate design names      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - Code + message the caller sees                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! │                           DbError  → ApiError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is Not An Error
//! An unknown yarn count is not an error. The resolver returns zero hank
//! weight and price, and the pipeline lists the label in
//! `CostingResult::unresolved_counts` so the caller can warn.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures of the calculation engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The pattern repeat sums to zero threads.
    ///
    /// ## When This Occurs
    /// - No segments at all
    /// - Every segment has a thread count of 0
    ///
    /// No number of repeats can ever reach a non-zero target, and a
    /// zero divisor would otherwise leak `NaN` into the weight shares.
    #[error("Pattern repeat has no threads ({segments} segments)")]
    EmptyRepeat { segments: usize },

    /// The repeat walk ended without reaching the target.
    ///
    /// Unreachable with correct floor division; reported instead of
    /// returning a silent empty result.
    #[error("No truncation segment reaches target {target} (repeat of {unit_sum} threads)")]
    TruncationNotFound { target: u32, unit_sum: u32 },

    /// Lot list and weight list are not index-aligned.
    #[error("Got {weights} weights for {lots} lots")]
    LotWeightMismatch { lots: usize, weights: usize },

    /// A status change the design lifecycle does not allow.
    #[error("Design {design_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        design_id: String,
        from: String,
        to: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is a path the form can highlight, e.g. `warps[1].reed`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. not a number, not a date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. the same color twice in a legend).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Field path this error points at.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

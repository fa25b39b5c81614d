//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Fabric Costing                         │
//! │                                                                         │
//! │  costing submit form.json                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid? ───── ValidationError ───────────┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  Pattern broken? ─── CoreError::EmptyRepeat ── ApiError ───────►│  │
//! │  │         │                                       ▲               │  │
//! │  │         ▼                                       │               │  │
//! │  │  Name taken? ─────── DbError::UniqueViolation ──┘               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code":"CONFLICT","message":"design_name 'Oxford' ..."}      │
//! │  exit status 1                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A duplicate design name gets its own `CONFLICT` code so a front end can
//! tell "pick another name" apart from "fix this field".

use serde::Serialize;

use costing_core::{CoreError, ValidationError};
use costing_db::DbError;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "warps[0].reed is required",
///   "field": "warps[0].reed"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Form field to highlight, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Unique name already taken, or a disallowed status change
    Conflict,

    /// Calculation invariant failed (empty repeat and friends)
    ComputationError,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ErrorCode::ValidationError | ErrorCode::NotFound => 2,
            ErrorCode::Conflict => 3,
            ErrorCode::ComputationError => 4,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

/// Converts validation errors, keeping the field path.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            field: Some(err.field().to_string()),
            message: err.to_string(),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            CoreError::EmptyRepeat { .. }
            | CoreError::TruncationNotFound { .. }
            | CoreError::LotWeightMismatch { .. } => {
                tracing::error!(error = %err, "Calculation invariant failed");
                ApiError::new(ErrorCode::ComputationError, err.to_string())
            }
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError {
                code: ErrorCode::Conflict,
                message: format!("{} '{}' already exists", field, value),
                field: Some(field),
            },
            DbError::Domain(e) => e.into(),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::CorruptColumn { column, message } => {
                tracing::error!(column = %column, "Stored value unreadable: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result alias for command handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_is_conflict() {
        let err: ApiError = DbError::duplicate("design_name", "Oxford").into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.field.as_deref(), Some("design_name"));
        assert_eq!(err.exit_code(), 3);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CONFLICT");
    }

    #[test]
    fn test_validation_keeps_field_path() {
        let err: ApiError = ValidationError::Required {
            field: "warps[0].reed".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("warps[0].reed"));
        assert_eq!(err.message, "warps[0].reed is required");
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::EmptyRepeat { segments: 2 }.into();
        assert_eq!(err.code, ErrorCode::ComputationError);

        let err: ApiError = DbError::Domain(CoreError::InvalidStatusTransition {
            design_id: "d-1".to_string(),
            from: "completed".to_string(),
            to: "pending".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_not_found_message() {
        let err: ApiError = DbError::not_found("Design", "d-9").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Design not found: d-9");

        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("field").is_none());
    }
}

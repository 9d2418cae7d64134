use std::fmt;

use thiserror::Error;

use crate::db::types::AssignmentType;

/// A grading formula whose parts do not add up to the 100 point scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct FormulaInvalid {
    pub reason: String,
}

impl FormulaInvalid {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Why the assignment gate refused a proposed assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    FormulaMissing,
    LabLimitExceeded { max: i32 },
    DuplicateExam,
    PointsMismatch { kind: AssignmentType, expected: i32, actual: i32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::FormulaMissing => {
                f.write_str("grading formula must be set before creating assignments")
            }
            Rejection::LabLimitExceeded { max } => {
                write!(f, "cannot add more labs, maximum allowed: {max}")
            }
            Rejection::DuplicateExam => f.write_str("course already has an exam"),
            Rejection::PointsMismatch { kind, expected, actual } => {
                write!(f, "{} points must be exactly {expected}, got {actual}", kind.label())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Maps unique-constraint violations onto `Conflict`.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(conflict.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("invalid grading formula: {0}")]
    FormulaInvalid(#[from] FormulaInvalid),
    #[error("assignment rejected: {0}")]
    AssignmentRejected(Rejection),
    #[error("student {student_id} is not enrolled in course {course_id}")]
    NotEnrolled { student_id: String, course_id: String },
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(StoreError),
}

impl GradingError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    /// Conflicts pass through as `Conflict`; anything else is logged with context and
    /// wrapped as `Store`.
    pub(crate) fn internal(err: StoreError, context: &str) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            other => {
                tracing::error!(error = %other, "{context}");
                Self::Store(other)
            }
        }
    }

    /// Everything except storage failures is caused by the caller's input and will not
    /// succeed on retry.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, GradingError::Store(StoreError::Database(_)))
    }
}

impl From<Rejection> for GradingError {
    fn from(value: Rejection) -> Self {
        GradingError::AssignmentRejected(value)
    }
}

impl From<StoreError> for GradingError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(message) => GradingError::Conflict(message),
            other => GradingError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for GradingError {
    fn from(value: validator::ValidationErrors) -> Self {
        GradingError::InvalidInput(value.to_string())
    }
}

//! Error types for the Attendance Recording Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance.

use chrono::NaiveDate;
use thiserror::Error;

use crate::auth::Permission;

/// Coarse classification of an [`AttendanceError`].
///
/// Callers branch on the kind rather than on individual variants: validation
/// and not-found failures are terminal, authorization failures indicate a
/// missing grant, and conflicts invite the caller to retry as an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or ill-timed input; nothing was applied.
    Validation,
    /// The actor lacks a permission, scope, or enabled feature.
    Authorization,
    /// A referenced employee or record does not exist.
    NotFound,
    /// A concurrent writer or an unauthorized override attempt.
    Conflict,
    /// A collaborator (store, audit) failed.
    Internal,
}

/// The main error type for the Attendance Recording Engine.
///
/// Every variant carries a stable machine-readable code (see
/// [`AttendanceError::code`]) in addition to its human-readable message, so
/// callers can react programmatically without parsing text.
///
/// # Example
///
/// ```
/// use attendance_engine::error::{AttendanceError, ErrorKind};
///
/// let error = AttendanceError::InvalidStatus { value: "presnt".to_string() };
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// assert_eq!(error.code(), "INVALID_STATUS");
/// assert_eq!(error.to_string(), "invalid attendance status 'presnt'");
/// ```
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// The attendance date string did not match the `YYYY-MM-DD` grammar or
    /// was not a real calendar date.
    #[error("invalid attendance date '{value}'")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// The status string did not normalize to PRESENT, ABSENT, or LEAVE.
    #[error("invalid attendance status '{value}'")]
    InvalidStatus {
        /// The rejected input.
        value: String,
    },

    /// The source string did not normalize to HR, SYSTEM, or SELF.
    #[error("invalid attendance source '{value}'")]
    InvalidSource {
        /// The rejected input.
        value: String,
    },

    /// The attendance date is before the store's current date.
    #[error("attendance for {date} is in the past; only the current date can be marked")]
    PastDate {
        /// The rejected date.
        date: NaiveDate,
    },

    /// The attendance date is after the store's current date.
    #[error("attendance for {date} is in the future; only the current date can be marked")]
    FutureDate {
        /// The rejected date.
        date: NaiveDate,
    },

    /// The attendance date precedes the employee's employment start.
    #[error("attendance date {date} precedes employment start {start}")]
    BeforeEmployment {
        /// The rejected date.
        date: NaiveDate,
        /// The employee's first day of employment.
        start: NaiveDate,
    },

    /// An override was requested without a usable reason.
    #[error("a non-empty reason is required to override an attendance record")]
    MissingReason,

    /// No employee exists with the given id.
    #[error("employee not found: {id}")]
    EmployeeNotFound {
        /// The unknown employee id.
        id: String,
    },

    /// The employee exists but is not active.
    #[error("employee {id} is not active")]
    EmployeeInactive {
        /// The inactive employee id.
        id: String,
    },

    /// No attendance record exists for the employee on the given date.
    #[error("no attendance record exists for employee {employee_id} on {date}")]
    RecordNotFound {
        /// The employee the override targeted.
        employee_id: String,
        /// The date the override targeted.
        date: NaiveDate,
    },

    /// The actor does not hold a required permission.
    #[error("actor is missing the {permission} permission")]
    PermissionDenied {
        /// The permission that was required.
        permission: Permission,
    },

    /// The actor holds the permission but not for this employee's division.
    #[error("actor {actor_id} is not permitted to act on employee {employee_id}")]
    ScopeDenied {
        /// The actor whose grant was out of scope.
        actor_id: String,
        /// The employee the actor tried to act on.
        employee_id: String,
    },

    /// Self-marking was attempted while the feature is disabled.
    #[error("self marking of attendance is disabled")]
    SelfMarkDisabled,

    /// Self-marking was attempted for a different employee.
    #[error("employees may only self-mark their own attendance")]
    SelfMarkMismatch,

    /// The month containing the attendance date is closed.
    #[error("the month containing {date} is closed for attendance changes")]
    MonthClosed {
        /// The date whose month is closed.
        date: NaiveDate,
    },

    /// A record already exists for this employee and date; an override with
    /// the override permission and a reason is required to change it.
    #[error("attendance is already marked for this date; an override is required")]
    OverrideRequired,

    /// A fresh insert lost its uniqueness race and the re-fetch found
    /// nothing either.
    #[error("failed to mark attendance for employee {employee_id}")]
    MarkFailed {
        /// The employee whose insert failed.
        employee_id: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {message}")]
    Config {
        /// A description of the configuration problem.
        message: String,
    },

    /// The backing store failed.
    #[error("store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },

    /// The audit sink failed to append an entry.
    #[error("audit error: {message}")]
    Audit {
        /// A description of the audit failure.
        message: String,
    },
}

impl AttendanceError {
    /// Returns the coarse [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDate { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidSource { .. }
            | Self::PastDate { .. }
            | Self::FutureDate { .. }
            | Self::BeforeEmployment { .. }
            | Self::MissingReason
            | Self::EmployeeInactive { .. }
            | Self::MarkFailed { .. } => ErrorKind::Validation,
            Self::PermissionDenied { .. }
            | Self::ScopeDenied { .. }
            | Self::SelfMarkDisabled
            | Self::SelfMarkMismatch
            | Self::MonthClosed { .. } => ErrorKind::Authorization,
            Self::EmployeeNotFound { .. } | Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::OverrideRequired => ErrorKind::Conflict,
            Self::Config { .. } | Self::Store { .. } | Self::Audit { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::InvalidSource { .. } => "INVALID_SOURCE",
            Self::PastDate { .. } => "PAST_DATE",
            Self::FutureDate { .. } => "FUTURE_DATE",
            Self::BeforeEmployment { .. } => "BEFORE_EMPLOYMENT",
            Self::MissingReason => "MISSING_REASON",
            Self::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            Self::EmployeeInactive { .. } => "EMPLOYEE_INACTIVE",
            Self::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::ScopeDenied { .. } => "SCOPE_DENIED",
            Self::SelfMarkDisabled => "SELF_MARK_DISABLED",
            Self::SelfMarkMismatch => "SELF_MARK_MISMATCH",
            Self::MonthClosed { .. } => "MONTH_CLOSED",
            Self::OverrideRequired => "OVERRIDE_REQUIRED",
            Self::MarkFailed { .. } => "MARK_FAILED",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Store { .. } => "STORE_ERROR",
            Self::Audit { .. } => "AUDIT_ERROR",
        }
    }
}

/// A type alias for Results that return AttendanceError.
pub type AttendanceResult<T> = Result<T, AttendanceError>;

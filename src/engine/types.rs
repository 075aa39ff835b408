//! Request and outcome types for the engine entry points.

use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::Permission;
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, MonthCloseStatus};
use crate::policy;

/// The caller on whose behalf an engine operation runs.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The actor's identity.
    pub id: String,
    /// The permission codes the actor holds.
    pub permissions: Vec<Permission>,
}

/// Input to [`mark`](super::AttendanceEngine::mark).
///
/// Date, status, and source arrive as strings and are normalized by policy;
/// `reason` is consulted only when the write lands on an existing record and
/// becomes an override.
#[derive(Debug, Clone)]
pub struct MarkRequest {
    /// The employee to mark.
    pub employee_id: String,
    /// The attendance date, `YYYY-MM-DD`.
    pub date: String,
    /// The status to record.
    pub status: String,
    /// Who is producing the record.
    pub source: String,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Override reason; required only on the override branch.
    pub reason: Option<String>,
    /// The calling actor.
    pub actor: Actor,
}

/// Input to [`override_record`](super::AttendanceEngine::override_record).
#[derive(Debug, Clone)]
pub struct OverrideRequest {
    /// The employee whose record is overridden.
    pub employee_id: String,
    /// The attendance date, `YYYY-MM-DD`.
    pub date: String,
    /// The new status.
    pub status: String,
    /// The new source.
    pub source: String,
    /// Optional replacement note.
    pub note: Option<String>,
    /// The stated reason; must be non-empty.
    pub reason: String,
    /// The calling actor.
    pub actor: Actor,
}

/// A successful single-record write.
#[derive(Debug, Clone, Serialize)]
pub struct MarkOutcome {
    /// The record as stored after the write.
    pub record: AttendanceRecord,
    /// The close status observed for the record's month.
    pub month_status: MonthCloseStatus,
}

/// One employee's entry in a bulk mark call.
#[derive(Debug, Clone)]
pub struct BulkItem {
    /// The employee to mark.
    pub employee_id: String,
    /// The status to record for this employee.
    pub status: String,
    /// Optional per-employee note.
    pub note: Option<String>,
}

/// Input to [`bulk_mark`](super::AttendanceEngine::bulk_mark).
///
/// The date and source are shared by every item; the optional reason is
/// consulted for items that land on existing records.
#[derive(Debug, Clone)]
pub struct BulkMarkRequest {
    /// The attendance date shared by all items, `YYYY-MM-DD`.
    pub date: String,
    /// The source shared by all items.
    pub source: String,
    /// Shared override reason for items that hit existing records.
    pub reason: Option<String>,
    /// The per-employee entries.
    pub items: Vec<BulkItem>,
    /// The calling actor.
    pub actor: Actor,
}

/// How one bulk item fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOutcome {
    /// A fresh record was created.
    Created,
    /// An existing record was overridden.
    Updated,
    /// The item failed; the batch continued without it.
    Failed,
}

/// The error attached to a failed bulk item.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemError {
    /// The stable machine-readable code.
    pub code: String,
    /// The human-readable message.
    pub message: String,
}

impl From<&AttendanceError> for BulkItemError {
    fn from(error: &AttendanceError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Per-item result of a bulk mark call.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemOutcome {
    /// The employee the item targeted.
    pub employee_id: String,
    /// The shared attendance date.
    pub date: NaiveDate,
    /// The status string as requested, before normalization.
    pub status: String,
    /// What happened to the item.
    pub outcome: BulkOutcome,
    /// The failure, present only when `outcome` is Failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkItemError>,
}

/// Result of a bulk mark call: one entry per requested item, in order.
#[derive(Debug, Clone, Serialize)]
pub struct BulkMarkOutcome {
    /// Per-item outcomes.
    pub results: Vec<BulkItemOutcome>,
}

/// Selects a calendar month, optionally narrowed to one division.
#[derive(Debug, Clone)]
pub struct MonthQuery {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1 through 12.
    pub month: u32,
    /// Restrict to one division when set.
    pub division: Option<String>,
}

impl MonthQuery {
    /// Returns the first and last day of the selected month.
    pub fn range(&self) -> AttendanceResult<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            AttendanceError::InvalidDate {
                value: format!("{}-{:02}", self.year, self.month),
            }
        })?;
        Ok((start, policy::month_end(start)))
    }
}

/// Attendance counts for one employee over one month.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeMonthSummary {
    /// The employee.
    pub employee_id: String,
    /// The employee's display name.
    pub name: String,
    /// Days marked PRESENT.
    pub present: u32,
    /// Days marked ABSENT.
    pub absent: u32,
    /// Days marked LEAVE.
    pub leave: u32,
}

/// Month-level aggregation across employees.
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    /// The calendar year.
    pub year: i32,
    /// The calendar month.
    pub month: u32,
    /// The month's close status.
    pub month_status: MonthCloseStatus,
    /// One entry per employee in scope, sorted by employee id.
    pub employees: Vec<EmployeeMonthSummary>,
}

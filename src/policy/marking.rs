//! Who may mark what: enum normalization, employment bounds, self-marking.

use chrono::NaiveDate;

use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceSource, AttendanceStatus, Employee};

/// Normalizes a status string case-insensitively.
pub fn parse_status(value: &str) -> AttendanceResult<AttendanceStatus> {
    value.parse().map_err(|_| AttendanceError::InvalidStatus {
        value: value.to_string(),
    })
}

/// Normalizes a source string case-insensitively.
pub fn parse_source(value: &str) -> AttendanceResult<AttendanceSource> {
    value.parse().map_err(|_| AttendanceError::InvalidSource {
        value: value.to_string(),
    })
}

/// Requires the employee to be active.
pub fn ensure_active(employee: &Employee) -> AttendanceResult<()> {
    if employee.is_active() {
        Ok(())
    } else {
        Err(AttendanceError::EmployeeInactive {
            id: employee.id.clone(),
        })
    }
}

/// Requires the attendance date to fall on or after the employee's
/// employment start (the joining date when recorded, else the day the
/// employee record was created).
pub fn ensure_within_employment(date: NaiveDate, employee: &Employee) -> AttendanceResult<()> {
    let start = employee.employment_start();
    if date < start {
        Err(AttendanceError::BeforeEmployment { date, start })
    } else {
        Ok(())
    }
}

/// Enforces the self-marking gate.
///
/// `SELF`-sourced writes require the self-mark feature to be enabled AND the
/// actor to be the target employee. Other sources pass through untouched.
pub fn check_self_mark(
    source: AttendanceSource,
    self_mark_enabled: bool,
    actor_id: &str,
    employee_id: &str,
) -> AttendanceResult<()> {
    if source != AttendanceSource::SelfMark {
        return Ok(());
    }
    if !self_mark_enabled {
        return Err(AttendanceError::SelfMarkDisabled);
    }
    if actor_id != employee_id {
        return Err(AttendanceError::SelfMarkMismatch);
    }
    Ok(())
}

/// Requires a non-empty override reason and returns it trimmed.
pub fn require_reason(reason: Option<&str>) -> AttendanceResult<String> {
    match reason.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AttendanceError::MissingReason),
    }
}

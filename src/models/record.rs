//! Attendance record model and its status/source enums.
//!
//! One record captures one employee's status for one calendar day. The store
//! enforces at most one record per (employee, date) pair; the engine never
//! deletes records, it only creates and overrides them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The attendance status recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// The employee was present.
    Present,
    /// The employee was absent.
    Absent,
    /// The employee was on leave.
    Leave,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "PRESENT"),
            AttendanceStatus::Absent => write!(f, "ABSENT"),
            AttendanceStatus::Leave => write!(f, "LEAVE"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ();

    /// Parses a status case-insensitively; `"present"`, `"Present"`, and
    /// `"PRESENT"` all normalize to [`AttendanceStatus::Present`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRESENT" => Ok(AttendanceStatus::Present),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            "LEAVE" => Ok(AttendanceStatus::Leave),
            _ => Err(()),
        }
    }
}

/// Who produced an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceSource {
    /// Entered by HR staff.
    #[serde(rename = "HR")]
    Hr,
    /// Written by an automated integration such as the leave workflow.
    #[serde(rename = "SYSTEM")]
    System,
    /// Entered by the employee for themselves.
    #[serde(rename = "SELF")]
    SelfMark,
}

impl fmt::Display for AttendanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceSource::Hr => write!(f, "HR"),
            AttendanceSource::System => write!(f, "SYSTEM"),
            AttendanceSource::SelfMark => write!(f, "SELF"),
        }
    }
}

impl FromStr for AttendanceSource {
    type Err = ();

    /// Parses a source case-insensitively to its canonical form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HR" => Ok(AttendanceSource::Hr),
            "SYSTEM" => Ok(AttendanceSource::System),
            "SELF" => Ok(AttendanceSource::SelfMark),
            _ => Err(()),
        }
    }
}

/// One employee's attendance entry for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar date the record covers; no time component.
    pub date: NaiveDate,
    /// The recorded status.
    pub status: AttendanceStatus,
    /// Who produced the record.
    pub source: AttendanceSource,
    /// Optional free-text note.
    pub note: Option<String>,
    /// The actor that last wrote the record.
    pub marked_by: String,
    /// When the record was last marked.
    pub marked_at: DateTime<Utc>,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// Monotonically increasing change counter; 1 on creation.
    pub version: u32,
}

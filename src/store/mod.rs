//! Storage port for attendance records and the facts the engine reads.
//!
//! The concrete schema and query text live behind [`AttendanceStore`]; a
//! relational implementation runs each engine call inside one database
//! transaction. [`memory::InMemoryStore`] is the in-crate implementation
//! used by tests and local runs.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AttendanceResult;
use crate::models::{
    AttendanceRecord, AttendanceSource, AttendanceStatus, Employee, MonthCloseStatus,
};

pub use memory::InMemoryStore;

/// Field set for a fresh attendance record.
///
/// The store assigns the id, the timestamps, and version 1.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// The employee the record is for.
    pub employee_id: String,
    /// The calendar date the record covers.
    pub date: NaiveDate,
    /// The status to record.
    pub status: AttendanceStatus,
    /// Who produced the record.
    pub source: AttendanceSource,
    /// Optional free-text note.
    pub note: Option<String>,
    /// The actor writing the record.
    pub marked_by: String,
}

/// Field set applied to an existing record by an update.
///
/// The store increments `version` and refreshes `marked_at`/`updated_at`;
/// there is no expected-version parameter, so interleaved updates are
/// last-writer-wins.
#[derive(Debug, Clone)]
pub struct RecordPatch {
    /// The new status.
    pub status: AttendanceStatus,
    /// The new source.
    pub source: AttendanceSource,
    /// The new note; None clears any existing note.
    pub note: Option<String>,
    /// The actor performing the update.
    pub marked_by: String,
}

/// The tagged result of looking up the (employee, date) slot.
///
/// Making the two branches explicit keeps the insert/override decision
/// exhaustive instead of hanging off a nullable return.
#[derive(Debug, Clone)]
pub enum RecordSlot {
    /// No record exists for the pair yet.
    Vacant,
    /// A record already occupies the pair.
    Occupied(AttendanceRecord),
}

impl From<Option<AttendanceRecord>> for RecordSlot {
    fn from(found: Option<AttendanceRecord>) -> Self {
        match found {
            Some(record) => RecordSlot::Occupied(record),
            None => RecordSlot::Vacant,
        }
    }
}

/// Port over the attendance store.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Returns the store's notion of the current date.
    ///
    /// This is the single source of truth for day boundaries; tests pin it
    /// to arbitrary dates instead of relying on wall-clock time.
    async fn today(&self) -> AttendanceResult<NaiveDate>;

    /// Fetches an employee by id.
    async fn employee(&self, id: &str) -> AttendanceResult<Option<Employee>>;

    /// Fetches the record for an (employee, date) pair, if any.
    async fn record_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>>;

    /// Conflict-safe insert.
    ///
    /// Returns the created record, or None when the (employee, date) slot
    /// was already occupied — a racing writer won — so callers can tell a
    /// lost race apart from other failures.
    async fn insert_record(&self, fields: NewRecord) -> AttendanceResult<Option<AttendanceRecord>>;

    /// Applies a patch to an existing record, incrementing its version and
    /// refreshing `marked_at`/`updated_at`.
    async fn update_record(
        &self,
        id: Uuid,
        fields: RecordPatch,
    ) -> AttendanceResult<AttendanceRecord>;

    /// Lists records with dates in `start..=end`, optionally filtered to one
    /// division.
    async fn records_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        division: Option<&str>,
    ) -> AttendanceResult<Vec<AttendanceRecord>>;

    /// Lists employees, optionally filtered to one division.
    async fn employees(&self, division: Option<&str>) -> AttendanceResult<Vec<Employee>>;

    /// Returns the close status of the month ending on `month_end`.
    async fn month_close_status(&self, month_end: NaiveDate)
    -> AttendanceResult<MonthCloseStatus>;
}

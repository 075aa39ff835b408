//! In-memory store implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{
    AttendanceRecord, Employee, MonthCloseStatus,
};

use super::{AttendanceStore, NewRecord, RecordPatch};

/// [`AttendanceStore`] backed by maps under one mutex.
///
/// Records are keyed by (employee_id, date), which is how the uniqueness
/// constraint is enforced: an insert into an occupied slot reports "no row"
/// instead of replacing it. The current date is injected at construction so
/// tests can pin any day.
///
/// # Example
///
/// ```
/// use attendance_engine::store::InMemoryStore;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// let store = InMemoryStore::with_today(today);
/// ```
pub struct InMemoryStore {
    inner: Mutex<State>,
}

struct State {
    today: NaiveDate,
    employees: HashMap<String, Employee>,
    records: HashMap<(String, NaiveDate), AttendanceRecord>,
    closed_months: HashSet<(i32, u32)>,
}

impl InMemoryStore {
    /// Creates an empty store whose current date is today's wall-clock date.
    pub fn new() -> Self {
        Self::with_today(Utc::now().date_naive())
    }

    /// Creates an empty store pinned to the given current date.
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            inner: Mutex::new(State {
                today,
                employees: HashMap::new(),
                records: HashMap::new(),
                closed_months: HashSet::new(),
            }),
        }
    }

    /// Seeds an employee.
    pub fn add_employee(&self, employee: Employee) {
        let mut state = self.lock();
        state.employees.insert(employee.id.clone(), employee);
    }

    /// Marks a calendar month as closed.
    pub fn close_month(&self, year: i32, month: u32) {
        self.lock().closed_months.insert((year, month));
    }

    /// Reopens a previously closed month.
    pub fn reopen_month(&self, year: i32, month: u32) {
        self.lock().closed_months.remove(&(year, month));
    }

    /// Moves the store's current date.
    pub fn set_today(&self, today: NaiveDate) {
        self.lock().today = today;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.inner.lock().expect("store state poisoned")
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn today(&self) -> AttendanceResult<NaiveDate> {
        Ok(self.lock().today)
    }

    async fn employee(&self, id: &str) -> AttendanceResult<Option<Employee>> {
        Ok(self.lock().employees.get(id).cloned())
    }

    async fn record_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        Ok(self
            .lock()
            .records
            .get(&(employee_id.to_string(), date))
            .cloned())
    }

    async fn insert_record(&self, fields: NewRecord) -> AttendanceResult<Option<AttendanceRecord>> {
        let mut state = self.lock();
        let key = (fields.employee_id.clone(), fields.date);
        if state.records.contains_key(&key) {
            // Uniqueness violation: report "no row" rather than an error.
            return Ok(None);
        }

        let now = Utc::now();
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: fields.employee_id,
            date: fields.date,
            status: fields.status,
            source: fields.source,
            note: fields.note,
            marked_by: fields.marked_by,
            marked_at: now,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        state.records.insert(key, record.clone());
        Ok(Some(record))
    }

    async fn update_record(
        &self,
        id: Uuid,
        fields: RecordPatch,
    ) -> AttendanceResult<AttendanceRecord> {
        let mut state = self.lock();
        let record = state
            .records
            .values_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AttendanceError::Store {
                message: format!("no attendance record with id {}", id),
            })?;

        let now = Utc::now();
        record.status = fields.status;
        record.source = fields.source;
        record.note = fields.note;
        record.marked_by = fields.marked_by;
        record.marked_at = now;
        record.updated_at = now;
        record.version += 1;
        Ok(record.clone())
    }

    async fn records_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        division: Option<&str>,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        let state = self.lock();
        let mut records: Vec<AttendanceRecord> = state
            .records
            .values()
            .filter(|r| r.date >= start && r.date <= end)
            .filter(|r| match division {
                Some(division) => state
                    .employees
                    .get(&r.employee_id)
                    .is_some_and(|e| e.division == division),
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
        Ok(records)
    }

    async fn employees(&self, division: Option<&str>) -> AttendanceResult<Vec<Employee>> {
        let state = self.lock();
        let mut employees: Vec<Employee> = state
            .employees
            .values()
            .filter(|e| division.is_none_or(|d| e.division == d))
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(employees)
    }

    async fn month_close_status(
        &self,
        month_end: NaiveDate,
    ) -> AttendanceResult<MonthCloseStatus> {
        let state = self.lock();
        let key = (month_end.year(), month_end.month());
        if state.closed_months.contains(&key) {
            Ok(MonthCloseStatus::Closed)
        } else {
            Ok(MonthCloseStatus::Open)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceSource, AttendanceStatus, EmployeeStatus};
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn employee(id: &str, division: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            division: division.to_string(),
            joining_date: Some(date("2024-01-01")),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    fn new_record(employee_id: &str, day: &str) -> NewRecord {
        NewRecord {
            employee_id: employee_id.to_string(),
            date: date(day),
            status: AttendanceStatus::Present,
            source: AttendanceSource::Hr,
            note: None,
            marked_by: "hr_001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_today_is_pinned() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        assert_eq!(store.today().await.unwrap(), date("2025-03-15"));

        store.set_today(date("2025-03-16"));
        assert_eq!(store.today().await.unwrap(), date("2025-03-16"));
    }

    #[tokio::test]
    async fn test_insert_assigns_version_one_and_round_trips() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        let created = store
            .insert_record(new_record("emp_001", "2025-03-15"))
            .await
            .unwrap()
            .expect("slot was vacant");

        assert_eq!(created.version, 1);
        assert_eq!(created.status, AttendanceStatus::Present);

        let fetched = store
            .record_for("emp_001", date("2025-03-15"))
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_insert_into_occupied_slot_returns_no_row() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        store
            .insert_record(new_record("emp_001", "2025-03-15"))
            .await
            .unwrap()
            .expect("first insert succeeds");

        let second = store
            .insert_record(new_record("emp_001", "2025-03-15"))
            .await
            .unwrap();
        assert!(second.is_none());

        // The original record is untouched.
        let fetched = store
            .record_for("emp_001", date("2025-03-15"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.version, 1);
    }

    #[tokio::test]
    async fn test_update_increments_version_by_exactly_one() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        let created = store
            .insert_record(new_record("emp_001", "2025-03-15"))
            .await
            .unwrap()
            .unwrap();

        let updated = store
            .update_record(
                created.id,
                RecordPatch {
                    status: AttendanceStatus::Absent,
                    source: AttendanceSource::Hr,
                    note: Some("correction".to_string()),
                    marked_by: "hr_002".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.status, AttendanceStatus::Absent);
        assert_eq!(updated.marked_by, "hr_002");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_store_error() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        let result = store
            .update_record(
                Uuid::new_v4(),
                RecordPatch {
                    status: AttendanceStatus::Absent,
                    source: AttendanceSource::Hr,
                    note: None,
                    marked_by: "hr_001".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AttendanceError::Store { .. })));
    }

    #[tokio::test]
    async fn test_records_in_range_filters_by_division() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        store.add_employee(employee("emp_eng", "engineering"));
        store.add_employee(employee("emp_fin", "finance"));
        store
            .insert_record(new_record("emp_eng", "2025-03-10"))
            .await
            .unwrap();
        store
            .insert_record(new_record("emp_fin", "2025-03-10"))
            .await
            .unwrap();
        store
            .insert_record(new_record("emp_eng", "2025-04-01"))
            .await
            .unwrap();

        let march = store
            .records_in_range(date("2025-03-01"), date("2025-03-31"), None)
            .await
            .unwrap();
        assert_eq!(march.len(), 2);

        let march_eng = store
            .records_in_range(date("2025-03-01"), date("2025-03-31"), Some("engineering"))
            .await
            .unwrap();
        assert_eq!(march_eng.len(), 1);
        assert_eq!(march_eng[0].employee_id, "emp_eng");
    }

    #[tokio::test]
    async fn test_employees_filters_and_sorts() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        store.add_employee(employee("emp_b", "engineering"));
        store.add_employee(employee("emp_a", "engineering"));
        store.add_employee(employee("emp_c", "finance"));

        let all = store.employees(None).await.unwrap();
        assert_eq!(
            all.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["emp_a", "emp_b", "emp_c"]
        );

        let eng = store.employees(Some("engineering")).await.unwrap();
        assert_eq!(eng.len(), 2);
    }

    #[tokio::test]
    async fn test_month_close_status() {
        let store = InMemoryStore::with_today(date("2025-03-15"));
        assert_eq!(
            store.month_close_status(date("2025-02-28")).await.unwrap(),
            MonthCloseStatus::Open
        );

        store.close_month(2025, 2);
        assert_eq!(
            store.month_close_status(date("2025-02-28")).await.unwrap(),
            MonthCloseStatus::Closed
        );

        store.reopen_month(2025, 2);
        assert_eq!(
            store.month_close_status(date("2025-02-28")).await.unwrap(),
            MonthCloseStatus::Open
        );
    }
}

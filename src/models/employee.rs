//! Employee model and related types.
//!
//! Employees are owned by an external employee-management component; the
//! engine only reads them to validate attendance writes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether an employee is currently employed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// The employee is active and attendance may be recorded for them.
    Active,
    /// The employee has left or is suspended; attendance writes are rejected.
    Inactive,
}

/// An employee as seen by the attendance engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The organizational division the employee belongs to.
    pub division: String,
    /// The explicit joining date, when one was recorded.
    pub joining_date: Option<NaiveDate>,
    /// When the employee record was created.
    pub created_at: DateTime<Utc>,
    /// The employee's activity status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns the first day attendance may be recorded for this employee.
    ///
    /// Derived from the explicit joining date when present, otherwise from
    /// the day the employee record was created.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{Employee, EmployeeStatus};
    /// use chrono::{NaiveDate, TimeZone, Utc};
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Asha Rao".to_string(),
    ///     division: "engineering".to_string(),
    ///     joining_date: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
    ///     created_at: Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
    ///     status: EmployeeStatus::Active,
    /// };
    /// assert_eq!(
    ///     employee.employment_start(),
    ///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    /// );
    /// ```
    pub fn employment_start(&self) -> NaiveDate {
        self.joining_date.unwrap_or_else(|| self.created_at.date_naive())
    }

    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_employee(status: EmployeeStatus) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Asha Rao".to_string(),
            division: "engineering".to_string(),
            joining_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap(),
            status,
        }
    }

    #[test]
    fn test_employment_start_prefers_joining_date() {
        let mut employee = create_test_employee(EmployeeStatus::Active);
        employee.joining_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(
            employee.employment_start(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_employment_start_falls_back_to_creation_day() {
        let employee = create_test_employee(EmployeeStatus::Active);
        assert_eq!(
            employee.employment_start(),
            NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
        );
    }

    #[test]
    fn test_is_active() {
        assert!(create_test_employee(EmployeeStatus::Active).is_active());
        assert!(!create_test_employee(EmployeeStatus::Inactive).is_active());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "emp_002",
            "name": "Lena Kovacs",
            "division": "finance",
            "joining_date": "2023-11-01",
            "created_at": "2023-10-15T08:00:00Z",
            "status": "ACTIVE"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_002");
        assert_eq!(employee.division, "finance");
        assert_eq!(
            employee.joining_date,
            Some(NaiveDate::from_ymd_opt(2023, 11, 1).unwrap())
        );
        assert_eq!(employee.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = create_test_employee(EmployeeStatus::Inactive);
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }
}

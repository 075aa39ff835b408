//! Month reads: record listing and per-employee summary.

use std::collections::HashMap;

use crate::auth::Permission;
use crate::error::AttendanceResult;
use crate::models::{AttendanceRecord, AttendanceStatus};

use super::{Actor, AttendanceEngine, EmployeeMonthSummary, MonthQuery, MonthSummary};

impl AttendanceEngine {
    /// Lists a month's attendance records, optionally narrowed to one
    /// division, sorted by date then employee id.
    pub async fn records_by_month(
        &self,
        query: MonthQuery,
        actor: &Actor,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        self.ensure_permission(actor, Permission::AttendanceRead)?;
        let (start, end) = query.range()?;
        self.store
            .records_in_range(start, end, query.division.as_deref())
            .await
    }

    /// Counts each employee's Present/Absent/Leave days over one month.
    pub async fn month_summary(
        &self,
        query: MonthQuery,
        actor: &Actor,
    ) -> AttendanceResult<MonthSummary> {
        self.ensure_permission(actor, Permission::AttendanceRead)?;
        let (start, end) = query.range()?;

        let employees = self.store.employees(query.division.as_deref()).await?;
        let records = self
            .store
            .records_in_range(start, end, query.division.as_deref())
            .await?;
        let month_status = self.store.month_close_status(end).await?;

        let mut counts: HashMap<&str, (u32, u32, u32)> = HashMap::new();
        for record in &records {
            let entry = counts.entry(record.employee_id.as_str()).or_default();
            match record.status {
                AttendanceStatus::Present => entry.0 += 1,
                AttendanceStatus::Absent => entry.1 += 1,
                AttendanceStatus::Leave => entry.2 += 1,
            }
        }

        let employees = employees
            .iter()
            .map(|employee| {
                let (present, absent, leave) = counts
                    .get(employee.id.as_str())
                    .copied()
                    .unwrap_or_default();
                EmployeeMonthSummary {
                    employee_id: employee.id.clone(),
                    name: employee.name.clone(),
                    present,
                    absent,
                    leave,
                }
            })
            .collect();

        Ok(MonthSummary {
            year: query.year,
            month: query.month,
            month_status,
            employees,
        })
    }
}

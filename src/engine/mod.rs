//! The attendance write engine.
//!
//! [`AttendanceEngine`] orchestrates the policy checks, store reads/writes,
//! scoped authorization, and audit append for the three write entry points
//! (`mark`, `override_record`, `bulk_mark`) and the two month reads. Each
//! entry point maps to one store transaction; checks run in a fixed order so
//! every failure mode surfaces as one distinct error kind.

mod bulk;
mod read;
mod types;
mod write;

pub use types::{
    Actor, BulkItem, BulkItemError, BulkItemOutcome, BulkMarkOutcome, BulkMarkRequest,
    BulkOutcome, EmployeeMonthSummary, MarkOutcome, MarkRequest, MonthQuery, MonthSummary,
    OverrideRequest,
};

use std::sync::Arc;

use chrono::NaiveDate;

use crate::audit::AuditSink;
use crate::auth::{AccessPolicy, Permission, has_permission};
use crate::config::AttendanceConfig;
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{Employee, MonthCloseStatus};
use crate::policy;
use crate::store::{AttendanceStore, RecordSlot};

/// Orchestrates attendance writes against the store, authorization, and
/// audit collaborators under the configured policy flags.
pub struct AttendanceEngine {
    store: Arc<dyn AttendanceStore>,
    access: Arc<dyn AccessPolicy>,
    audit: Arc<dyn AuditSink>,
    config: AttendanceConfig,
}

impl AttendanceEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        access: Arc<dyn AccessPolicy>,
        audit: Arc<dyn AuditSink>,
        config: AttendanceConfig,
    ) -> Self {
        Self {
            store,
            access,
            audit,
            config,
        }
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &AttendanceConfig {
        &self.config
    }

    /// Coarse permission check, run before any store I/O.
    fn ensure_permission(&self, actor: &Actor, permission: Permission) -> AttendanceResult<()> {
        if has_permission(&actor.permissions, permission) {
            Ok(())
        } else {
            Err(AttendanceError::PermissionDenied { permission })
        }
    }

    /// Fetches the employee and requires them to be active.
    async fn require_active_employee(&self, employee_id: &str) -> AttendanceResult<Employee> {
        let employee = self.store.employee(employee_id).await?.ok_or_else(|| {
            AttendanceError::EmployeeNotFound {
                id: employee_id.to_string(),
            }
        })?;
        policy::ensure_active(&employee)?;
        Ok(employee)
    }

    /// Reads the close status of the date's month and, when enforcement is
    /// enabled, rejects writes into a closed month. The observed status is
    /// returned either way so callers can surface it.
    async fn month_status_for(&self, date: NaiveDate) -> AttendanceResult<MonthCloseStatus> {
        let status = self
            .store
            .month_close_status(policy::month_end(date))
            .await?;
        if self.config.is_month_close_enforced() && status.is_closed() {
            return Err(AttendanceError::MonthClosed { date });
        }
        Ok(status)
    }

    /// Looks up the (employee, date) slot as a tagged value.
    async fn slot_for(&self, employee_id: &str, date: NaiveDate) -> AttendanceResult<RecordSlot> {
        Ok(self.store.record_for(employee_id, date).await?.into())
    }
}

//! Bulk marking: one shared date and source, per-item failure isolation.

use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::AuditAction;
use crate::auth::Permission;
use crate::error::{AttendanceResult, ErrorKind};
use crate::models::{AttendanceRecord, AttendanceSource};
use crate::policy;
use crate::store::RecordSlot;

use super::{
    Actor, AttendanceEngine, BulkItem, BulkItemOutcome, BulkMarkOutcome, BulkMarkRequest,
    BulkOutcome,
};

impl AttendanceEngine {
    /// Marks attendance for many employees in one call.
    ///
    /// The bulk-write permission and the transaction-level checks (shared
    /// date and source syntax, same-day rule, month-close gate) run once and
    /// abort the whole call on failure. After that, every item is processed
    /// independently: a validation, authorization, or conflict failure is
    /// demoted to a `Failed` entry in the result and the batch continues.
    /// Items landing on an existing record go through the override branch
    /// (audit action OVERRIDE) using the request's shared reason; fresh
    /// inserts audit as BULK_MARK. Infrastructure faults are not demoted and
    /// abort the batch.
    pub async fn bulk_mark(&self, request: BulkMarkRequest) -> AttendanceResult<BulkMarkOutcome> {
        let correlation_id = Uuid::new_v4();
        let actor = &request.actor;

        self.ensure_permission(actor, Permission::AttendanceBulkWrite)?;
        let source = policy::parse_source(&request.source)?;
        let date = policy::parse_date(&request.date)?;

        let today = self.store.today().await?;
        policy::ensure_current_date(date, today)?;
        self.month_status_for(date).await?;

        let mut results = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let applied = self
                .bulk_item(item, date, source, request.reason.as_deref(), actor, correlation_id)
                .await;
            match applied {
                Ok((outcome, record)) => {
                    info!(
                        correlation_id = %correlation_id,
                        employee_id = %record.employee_id,
                        outcome = ?outcome,
                        version = record.version,
                        "bulk item applied"
                    );
                    results.push(BulkItemOutcome {
                        employee_id: item.employee_id.clone(),
                        date,
                        status: item.status.clone(),
                        outcome,
                        error: None,
                    });
                }
                Err(err) if err.kind() == ErrorKind::Internal => {
                    // Infrastructure faults escape the per-item boundary and
                    // abort the batch.
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        employee_id = %item.employee_id,
                        error = %err,
                        "bulk item failed"
                    );
                    results.push(BulkItemOutcome {
                        employee_id: item.employee_id.clone(),
                        date,
                        status: item.status.clone(),
                        outcome: BulkOutcome::Failed,
                        error: Some((&err).into()),
                    });
                }
            }
        }

        Ok(BulkMarkOutcome { results })
    }

    /// Applies one bulk item; any error it returns is this item's failure.
    async fn bulk_item(
        &self,
        item: &BulkItem,
        date: chrono::NaiveDate,
        source: AttendanceSource,
        reason: Option<&str>,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> AttendanceResult<(BulkOutcome, AttendanceRecord)> {
        let status = policy::parse_status(&item.status)?;
        policy::check_self_mark(
            source,
            self.config.is_self_mark_enabled(),
            &actor.id,
            &item.employee_id,
        )?;
        self.access
            .assert_scoped_access(&actor.id, Permission::AttendanceWrite, &item.employee_id)
            .await?;
        let employee = self.require_active_employee(&item.employee_id).await?;
        policy::ensure_within_employment(date, &employee)?;

        match self.slot_for(&item.employee_id, date).await? {
            RecordSlot::Vacant => {
                let record = self
                    .create_record(
                        &item.employee_id,
                        date,
                        status,
                        source,
                        item.note.clone(),
                        actor,
                        AuditAction::BulkMark,
                        correlation_id,
                    )
                    .await?;
                Ok((BulkOutcome::Created, record))
            }
            RecordSlot::Occupied(existing) => {
                let record = self
                    .apply_override(
                        existing,
                        status,
                        source,
                        item.note.clone(),
                        reason,
                        actor,
                        correlation_id,
                    )
                    .await?;
                Ok((BulkOutcome::Updated, record))
            }
        }
    }
}

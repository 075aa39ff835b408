//! Single-record write entry points: `mark` and `override_record`.

use tracing::info;
use uuid::Uuid;

use crate::audit::{AuditAction, AuditLogEntry};
use crate::auth::{Permission, has_permission};
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, AttendanceSource, AttendanceStatus};
use crate::policy;
use crate::store::{NewRecord, RecordPatch, RecordSlot};

use super::{Actor, AttendanceEngine, MarkOutcome, MarkRequest, OverrideRequest};

impl AttendanceEngine {
    /// Records attendance for one employee on the current date.
    ///
    /// Checks run in a fixed order, each failing fast with its own error:
    /// coarse write permission, status/source/date syntax, the self-marking
    /// gate, the same-day rule, division-scoped authorization, employee
    /// existence and activity, the employment-period bound, and the
    /// month-close gate. If no record exists for the (employee, date) pair
    /// a fresh one is inserted; if one exists the call becomes an override
    /// and additionally requires the override permission plus a non-empty
    /// reason. Exactly one audit entry is written on success.
    pub async fn mark(&self, request: MarkRequest) -> AttendanceResult<MarkOutcome> {
        let correlation_id = Uuid::new_v4();
        let actor = &request.actor;

        self.ensure_permission(actor, Permission::AttendanceWrite)?;
        let status = policy::parse_status(&request.status)?;
        let source = policy::parse_source(&request.source)?;
        let date = policy::parse_date(&request.date)?;
        policy::check_self_mark(
            source,
            self.config.is_self_mark_enabled(),
            &actor.id,
            &request.employee_id,
        )?;

        let today = self.store.today().await?;
        policy::ensure_current_date(date, today)?;
        self.access
            .assert_scoped_access(&actor.id, Permission::AttendanceWrite, &request.employee_id)
            .await?;
        let employee = self.require_active_employee(&request.employee_id).await?;
        policy::ensure_within_employment(date, &employee)?;
        let month_status = self.month_status_for(date).await?;

        let record = match self.slot_for(&request.employee_id, date).await? {
            RecordSlot::Vacant => {
                self.create_record(
                    &request.employee_id,
                    date,
                    status,
                    source,
                    request.note.clone(),
                    actor,
                    AuditAction::Mark,
                    correlation_id,
                )
                .await?
            }
            RecordSlot::Occupied(existing) => {
                self.apply_override(
                    existing,
                    status,
                    source,
                    request.note.clone(),
                    request.reason.as_deref(),
                    actor,
                    correlation_id,
                )
                .await?
            }
        };

        info!(
            correlation_id = %correlation_id,
            employee_id = %record.employee_id,
            date = %record.date,
            status = %record.status,
            version = record.version,
            "attendance marked"
        );
        Ok(MarkOutcome {
            record,
            month_status,
        })
    }

    /// Changes an existing attendance record.
    ///
    /// Unlike [`mark`](Self::mark), the override permission is required from
    /// the start, the reason is required unconditionally before any store
    /// I/O, and the record must already exist; there is no insert fallback.
    pub async fn override_record(
        &self,
        request: OverrideRequest,
    ) -> AttendanceResult<MarkOutcome> {
        let correlation_id = Uuid::new_v4();
        let actor = &request.actor;

        self.ensure_permission(actor, Permission::AttendanceOverride)?;
        policy::require_reason(Some(&request.reason))?;
        let status = policy::parse_status(&request.status)?;
        let source = policy::parse_source(&request.source)?;
        let date = policy::parse_date(&request.date)?;
        policy::check_self_mark(
            source,
            self.config.is_self_mark_enabled(),
            &actor.id,
            &request.employee_id,
        )?;

        let today = self.store.today().await?;
        policy::ensure_current_date(date, today)?;
        self.access
            .assert_scoped_access(
                &actor.id,
                Permission::AttendanceOverride,
                &request.employee_id,
            )
            .await?;
        let employee = self.require_active_employee(&request.employee_id).await?;
        policy::ensure_within_employment(date, &employee)?;
        let month_status = self.month_status_for(date).await?;

        let existing = match self.slot_for(&request.employee_id, date).await? {
            RecordSlot::Occupied(record) => record,
            RecordSlot::Vacant => {
                return Err(AttendanceError::RecordNotFound {
                    employee_id: request.employee_id.clone(),
                    date,
                });
            }
        };

        let record = self
            .apply_override(
                existing,
                status,
                source,
                request.note.clone(),
                Some(&request.reason),
                actor,
                correlation_id,
            )
            .await?;

        info!(
            correlation_id = %correlation_id,
            employee_id = %record.employee_id,
            date = %record.date,
            status = %record.status,
            version = record.version,
            "attendance overridden"
        );
        Ok(MarkOutcome {
            record,
            month_status,
        })
    }

    /// Inserts a fresh record through the conflict-safe insert and audits it.
    ///
    /// A "no row" result means a concurrent writer claimed the slot between
    /// the lookup and the insert; the re-fetch decides whether to steer the
    /// caller into the override flow or report the write as failed.
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn create_record(
        &self,
        employee_id: &str,
        date: chrono::NaiveDate,
        status: AttendanceStatus,
        source: AttendanceSource,
        note: Option<String>,
        actor: &Actor,
        action: AuditAction,
        correlation_id: Uuid,
    ) -> AttendanceResult<AttendanceRecord> {
        let inserted = self
            .store
            .insert_record(NewRecord {
                employee_id: employee_id.to_string(),
                date,
                status,
                source,
                note,
                marked_by: actor.id.clone(),
            })
            .await?;

        let record = match inserted {
            Some(record) => record,
            None => {
                return match self.store.record_for(employee_id, date).await? {
                    Some(_) => Err(AttendanceError::OverrideRequired),
                    None => Err(AttendanceError::MarkFailed {
                        employee_id: employee_id.to_string(),
                    }),
                };
            }
        };

        self.audit
            .append(AuditLogEntry::attendance(
                action,
                None,
                record.clone(),
                &actor.id,
                None,
                correlation_id,
            ))
            .await?;
        Ok(record)
    }

    /// The override branch shared by `mark`, `override_record`, and bulk
    /// updates: override permission, trimmed reason, scoped authorization,
    /// then the versioned update and its audit entry with the prior
    /// snapshot.
    pub(super) async fn apply_override(
        &self,
        existing: AttendanceRecord,
        status: AttendanceStatus,
        source: AttendanceSource,
        note: Option<String>,
        reason: Option<&str>,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> AttendanceResult<AttendanceRecord> {
        if !has_permission(&actor.permissions, Permission::AttendanceOverride) {
            return Err(AttendanceError::OverrideRequired);
        }
        let reason = policy::require_reason(reason)?;
        self.access
            .assert_scoped_access(
                &actor.id,
                Permission::AttendanceOverride,
                &existing.employee_id,
            )
            .await?;

        let updated = self
            .store
            .update_record(
                existing.id,
                RecordPatch {
                    status,
                    source,
                    note,
                    marked_by: actor.id.clone(),
                },
            )
            .await?;

        self.audit
            .append(AuditLogEntry::attendance(
                AuditAction::Override,
                Some(existing),
                updated.clone(),
                &actor.id,
                Some(reason),
                correlation_id,
            ))
            .await?;
        Ok(updated)
    }
}

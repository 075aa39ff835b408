//! Leave-Sync adapter: the trusted write path used by the leave workflow.
//!
//! This adapter deliberately does not go through [`crate::engine`]: the
//! upstream leave-approval system is trusted, so its writes bypass the
//! permission, same-day, and month-close gates. Keeping it a separate
//! component makes that trust boundary explicit. Every write tags the
//! record's note with the originating leave-request identifier so a later
//! reversion can verify it owns the record before touching it.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::audit::{AuditAction, AuditLogEntry, AuditSink};
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, AttendanceSource, AttendanceStatus};
use crate::store::{AttendanceStore, NewRecord, RecordPatch};

/// Builds the bracketed ownership tag embedded in synced notes.
fn leave_tag(leave_request_id: &str) -> String {
    format!("[leave:{}]", leave_request_id)
}

/// Builds the note written by [`LeaveSync::apply_leave`].
fn leave_note(leave_request_id: &str, half_day: bool) -> String {
    let tag = leave_tag(leave_request_id);
    if half_day {
        format!("{} half day", tag)
    } else {
        tag
    }
}

/// Returns true if the note carries the exact tag for this leave request.
fn has_leave_tag(note: Option<&str>, leave_request_id: &str) -> bool {
    note.is_some_and(|n| n.contains(&leave_tag(leave_request_id)))
}

/// Applies and reverts leave-driven attendance state for the leave workflow.
pub struct LeaveSync {
    store: Arc<dyn AttendanceStore>,
    audit: Arc<dyn AuditSink>,
}

impl LeaveSync {
    /// Creates an adapter over the given store and audit sink.
    pub fn new(store: Arc<dyn AttendanceStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Forces the (employee, date) record to LEAVE on behalf of an approved
    /// leave request.
    ///
    /// Inserts when the slot is vacant, otherwise updates in place; a lost
    /// insert race falls back to the update path. The record's note embeds
    /// the leave-request identifier (and a half-day marker when set) so
    /// [`revert_leave`](Self::revert_leave) can verify ownership later.
    pub async fn apply_leave(
        &self,
        employee_id: &str,
        date: NaiveDate,
        leave_request_id: &str,
        half_day: bool,
        actor_id: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        let correlation_id = Uuid::new_v4();
        let note = leave_note(leave_request_id, half_day);

        let existing = self.store.record_for(employee_id, date).await?;
        let (before, record) = match existing {
            None => {
                let inserted = self
                    .store
                    .insert_record(NewRecord {
                        employee_id: employee_id.to_string(),
                        date,
                        status: AttendanceStatus::Leave,
                        source: AttendanceSource::System,
                        note: Some(note.clone()),
                        marked_by: actor_id.to_string(),
                    })
                    .await?;
                match inserted {
                    Some(record) => (None, record),
                    None => {
                        // Lost the race; the slot is occupied now.
                        let current = self.store.record_for(employee_id, date).await?.ok_or_else(
                            || AttendanceError::MarkFailed {
                                employee_id: employee_id.to_string(),
                            },
                        )?;
                        let updated = self
                            .force_update(&current, AttendanceStatus::Leave, Some(note), actor_id)
                            .await?;
                        (Some(current), updated)
                    }
                }
            }
            Some(current) => {
                let updated = self
                    .force_update(&current, AttendanceStatus::Leave, Some(note), actor_id)
                    .await?;
                (Some(current), updated)
            }
        };

        self.audit
            .append(AuditLogEntry::attendance(
                AuditAction::SyncApplied,
                before,
                record.clone(),
                actor_id,
                None,
                correlation_id,
            ))
            .await?;

        info!(
            correlation_id = %correlation_id,
            employee_id = %record.employee_id,
            date = %record.date,
            leave_request_id,
            "leave applied to attendance"
        );
        Ok(record)
    }

    /// Reverts a previously synced LEAVE record back to ABSENT.
    ///
    /// The revert only proceeds when the current record was written by the
    /// system AND its note carries this leave request's tag; anything else
    /// (record absent, manually entered, or owned by a different leave
    /// request) is left untouched and None is returned, with no audit entry.
    pub async fn revert_leave(
        &self,
        employee_id: &str,
        date: NaiveDate,
        leave_request_id: &str,
        actor_id: &str,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let correlation_id = Uuid::new_v4();

        let Some(current) = self.store.record_for(employee_id, date).await? else {
            return Ok(None);
        };
        if current.source != AttendanceSource::System
            || !has_leave_tag(current.note.as_deref(), leave_request_id)
        {
            return Ok(None);
        }

        let reverted = self
            .force_update(&current, AttendanceStatus::Absent, None, actor_id)
            .await?;

        self.audit
            .append(AuditLogEntry::attendance(
                AuditAction::SyncReverted,
                Some(current),
                reverted.clone(),
                actor_id,
                None,
                correlation_id,
            ))
            .await?;

        info!(
            correlation_id = %correlation_id,
            employee_id = %reverted.employee_id,
            date = %reverted.date,
            leave_request_id,
            "leave reverted in attendance"
        );
        Ok(Some(reverted))
    }

    async fn force_update(
        &self,
        current: &AttendanceRecord,
        status: AttendanceStatus,
        note: Option<String>,
        actor_id: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        self.store
            .update_record(
                current.id,
                RecordPatch {
                    status,
                    source: AttendanceSource::System,
                    note,
                    marked_by: actor_id.to_string(),
                },
            )
            .await
    }
}

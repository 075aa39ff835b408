//! Audit log entries and the append-only audit port.
//!
//! Every successful state-changing call produces exactly one entry (one per
//! item for bulk marking). The sink's own write failure fails the calling
//! operation; it has no other influence on the outcome.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AttendanceResult;
use crate::models::AttendanceRecord;

/// The entity type tag carried by attendance audit entries.
pub const AUDIT_ENTITY_ATTENDANCE: &str = "ATTENDANCE";

/// What kind of state change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// A fresh record was created by `mark`.
    #[serde(rename = "MARK")]
    Mark,
    /// An existing record was changed.
    #[serde(rename = "OVERRIDE")]
    Override,
    /// A fresh record was created by `bulk_mark`.
    #[serde(rename = "BULK_MARK")]
    BulkMark,
    /// The leave workflow forced a LEAVE record.
    #[serde(rename = "ATTENDANCE_SYNC_APPLIED")]
    SyncApplied,
    /// The leave workflow reverted its own LEAVE record.
    #[serde(rename = "ATTENDANCE_SYNC_REVERTED")]
    SyncReverted,
}

/// One immutable before/after entry describing a record change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// The kind of entity that changed; always [`AUDIT_ENTITY_ATTENDANCE`]
    /// for entries produced by this crate.
    pub entity_type: String,
    /// The id of the record that changed.
    pub entity_id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// Snapshot before the change; None when the record was created.
    pub before: Option<AttendanceRecord>,
    /// Snapshot after the change.
    pub after: AttendanceRecord,
    /// The actor that caused the change.
    pub actor_id: String,
    /// The human-stated reason, when one was required.
    pub reason: Option<String>,
    /// Correlates all entries written by one engine call.
    pub correlation_id: Uuid,
}

impl AuditLogEntry {
    /// Builds an attendance entry for the given change.
    pub fn attendance(
        action: AuditAction,
        before: Option<AttendanceRecord>,
        after: AttendanceRecord,
        actor_id: &str,
        reason: Option<String>,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            entity_type: AUDIT_ENTITY_ATTENDANCE.to_string(),
            entity_id: after.id,
            action,
            before,
            after,
            actor_id: actor_id.to_string(),
            reason,
            correlation_id,
        }
    }
}

/// Port for durably appending audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persists one entry.
    async fn append(&self, entry: AuditLogEntry) -> AttendanceResult<()>;
}

/// [`AuditSink`] that keeps entries in memory, for tests and local runs.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all appended entries, oldest first.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().expect("audit entries poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: AuditLogEntry) -> AttendanceResult<()> {
        self.entries
            .lock()
            .expect("audit entries poisoned")
            .push(entry);
        Ok(())
    }
}

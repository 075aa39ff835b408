//! Request types for the attendance API.
//!
//! DTOs mirror the engine's request types and convert into them; the actor
//! block is carried in the body for the write endpoints and in headers for
//! the read endpoints.

use serde::{Deserialize, Serialize};

use crate::auth::Permission;
use crate::engine::{Actor, BulkItem, BulkMarkRequest, MarkRequest, OverrideRequest};

/// The calling actor as presented by the upstream gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorBody {
    /// The actor's identity.
    pub id: String,
    /// Permission codes the actor holds.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl From<ActorBody> for Actor {
    fn from(body: ActorBody) -> Self {
        Actor {
            id: body.id,
            permissions: body.permissions,
        }
    }
}

/// Body of `POST /attendance/mark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkBody {
    /// The employee to mark.
    pub employee_id: String,
    /// The attendance date, `YYYY-MM-DD`.
    pub date: String,
    /// The status to record.
    pub status: String,
    /// Who is producing the record.
    pub source: String,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Override reason, consulted only when the write becomes an override.
    #[serde(default)]
    pub reason: Option<String>,
    /// The calling actor.
    pub actor: ActorBody,
}

impl From<MarkBody> for MarkRequest {
    fn from(body: MarkBody) -> Self {
        MarkRequest {
            employee_id: body.employee_id,
            date: body.date,
            status: body.status,
            source: body.source,
            note: body.note,
            reason: body.reason,
            actor: body.actor.into(),
        }
    }
}

/// Body of `POST /attendance/override`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideBody {
    /// The employee whose record is overridden.
    pub employee_id: String,
    /// The attendance date, `YYYY-MM-DD`.
    pub date: String,
    /// The new status.
    pub status: String,
    /// The new source.
    pub source: String,
    /// Optional replacement note.
    #[serde(default)]
    pub note: Option<String>,
    /// The stated reason; must be non-empty.
    pub reason: String,
    /// The calling actor.
    pub actor: ActorBody,
}

impl From<OverrideBody> for OverrideRequest {
    fn from(body: OverrideBody) -> Self {
        OverrideRequest {
            employee_id: body.employee_id,
            date: body.date,
            status: body.status,
            source: body.source,
            note: body.note,
            reason: body.reason,
            actor: body.actor.into(),
        }
    }
}

/// One entry of a bulk mark body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemBody {
    /// The employee to mark.
    pub employee_id: String,
    /// The status to record for this employee.
    pub status: String,
    /// Optional per-employee note.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<BulkItemBody> for BulkItem {
    fn from(body: BulkItemBody) -> Self {
        BulkItem {
            employee_id: body.employee_id,
            status: body.status,
            note: body.note,
        }
    }
}

/// Body of `POST /attendance/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkBody {
    /// The attendance date shared by all items, `YYYY-MM-DD`.
    pub date: String,
    /// The source shared by all items.
    pub source: String,
    /// Shared override reason for items landing on existing records.
    #[serde(default)]
    pub reason: Option<String>,
    /// The per-employee entries.
    pub items: Vec<BulkItemBody>,
    /// The calling actor.
    pub actor: ActorBody,
}

impl From<BulkMarkBody> for BulkMarkRequest {
    fn from(body: BulkMarkBody) -> Self {
        BulkMarkRequest {
            date: body.date,
            source: body.source,
            reason: body.reason,
            items: body.items.into_iter().map(Into::into).collect(),
            actor: body.actor.into(),
        }
    }
}

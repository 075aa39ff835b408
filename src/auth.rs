//! Permission codes and the scoped authorization port.
//!
//! Permission grants are owned by an external authorization component; the
//! engine never mutates them. It asks two questions: does the actor hold a
//! permission at all (coarse, pre-transaction), and does the actor hold it
//! for a specific employee's organizational scope (inside the transaction).

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, AttendanceResult};

/// Permission codes consumed by the attendance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Read attendance records and summaries.
    AttendanceRead,
    /// Create attendance records.
    AttendanceWrite,
    /// Change existing attendance records, with a stated reason.
    AttendanceOverride,
    /// Mark attendance for many employees in one call.
    AttendanceBulkWrite,
}

impl Permission {
    /// Resolves a permission from its wire code, case-sensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ATTENDANCE_READ" => Some(Permission::AttendanceRead),
            "ATTENDANCE_WRITE" => Some(Permission::AttendanceWrite),
            "ATTENDANCE_OVERRIDE" => Some(Permission::AttendanceOverride),
            "ATTENDANCE_BULK_WRITE" => Some(Permission::AttendanceBulkWrite),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Permission::AttendanceRead => "ATTENDANCE_READ",
            Permission::AttendanceWrite => "ATTENDANCE_WRITE",
            Permission::AttendanceOverride => "ATTENDANCE_OVERRIDE",
            Permission::AttendanceBulkWrite => "ATTENDANCE_BULK_WRITE",
        };
        write!(f, "{}", code)
    }
}

/// The organizational reach of a permission grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "scope", content = "division")]
pub enum PermissionScope {
    /// The grant covers every division.
    Company,
    /// The grant covers a single division.
    Division(String),
}

/// Returns true if the actor's permission set contains `permission`.
///
/// This is the coarse check the engine runs before opening a transaction;
/// the scoped check below still runs against the target employee.
pub fn has_permission(permissions: &[Permission], permission: Permission) -> bool {
    permissions.contains(&permission)
}

/// Port answering whether an actor may exercise a permission against a
/// specific employee's organizational scope.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Returns Ok if the actor holds `permission` for the employee's
    /// division (or company-wide), otherwise [`AttendanceError::ScopeDenied`].
    async fn assert_scoped_access(
        &self,
        actor_id: &str,
        permission: Permission,
        employee_id: &str,
    ) -> AttendanceResult<()>;
}

/// In-memory [`AccessPolicy`] over explicit grant and division tables.
///
/// Mirrors the external permission store's shape: each grant maps an
/// (actor, permission) pair to either a company-wide or single-division
/// scope, and employees are resolved to their division before matching.
#[derive(Default)]
pub struct StaticAccessPolicy {
    inner: Mutex<PolicyTables>,
}

#[derive(Default)]
struct PolicyTables {
    grants: HashMap<(String, Permission), PermissionScope>,
    divisions: HashMap<String, String>,
}

impl StaticAccessPolicy {
    /// Creates an empty policy that denies all scoped access.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a grant for an actor.
    pub fn grant(&self, actor_id: &str, permission: Permission, scope: PermissionScope) {
        let mut tables = self.inner.lock().expect("policy tables poisoned");
        tables
            .grants
            .insert((actor_id.to_string(), permission), scope);
    }

    /// Records which division an employee belongs to.
    pub fn assign_division(&self, employee_id: &str, division: &str) {
        let mut tables = self.inner.lock().expect("policy tables poisoned");
        tables
            .divisions
            .insert(employee_id.to_string(), division.to_string());
    }
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn assert_scoped_access(
        &self,
        actor_id: &str,
        permission: Permission,
        employee_id: &str,
    ) -> AttendanceResult<()> {
        let tables = self.inner.lock().expect("policy tables poisoned");
        let grant = tables
            .grants
            .get(&(actor_id.to_string(), permission));

        let allowed = match grant {
            Some(PermissionScope::Company) => true,
            Some(PermissionScope::Division(division)) => tables
                .divisions
                .get(employee_id)
                .is_some_and(|d| d == division),
            None => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(AttendanceError::ScopeDenied {
                actor_id: actor_id.to_string(),
                employee_id: employee_id.to_string(),
            })
        }
    }
}

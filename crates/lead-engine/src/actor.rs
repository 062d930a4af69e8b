//! Actor identity and permissions.
//!
//! The engine consumes an opaque view of the caller: an id plus the
//! permission set the identity service resolved for it. Coarse permission
//! checks happen upstream; the engine only enforces the state-machine
//! guards (assigned staff or a `leads.manage` holder).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lead-management permissions recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// May submit new inquiries on behalf of a channel.
    #[serde(rename = "leads.create")]
    LeadsCreate,
    /// May drive any lead through its lifecycle (held by managers).
    #[serde(rename = "leads.manage")]
    LeadsManage,
    /// May assign leads to staff explicitly.
    #[serde(rename = "leads.assign")]
    LeadsAssign,
}

/// The caller of an engine operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Opaque identity-service id; matched against `assigned_staff_id`.
    pub id: String,
    permissions: HashSet<Permission>,
}

impl Actor {
    /// Create an actor with an explicit permission set.
    pub fn new(id: impl Into<String>, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            id: id.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// A staff actor with no extra permissions; may only manage leads
    /// assigned to them.
    pub fn staff(id: impl Into<String>) -> Self {
        Self::new(id, [])
    }

    /// A manager actor holding the full lead permission set.
    pub fn manager(id: impl Into<String>) -> Self {
        Self::new(
            id,
            [
                Permission::LeadsCreate,
                Permission::LeadsManage,
                Permission::LeadsAssign,
            ],
        )
    }

    /// Whether the actor holds a permission.
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

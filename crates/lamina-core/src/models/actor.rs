//! Request context: who is calling, and what their role grants.
//!
//! Authentication is an external collaborator; the caller's role arrives
//! as request context (CLI flag, MCP server configuration) and is enforced
//! here before any write reaches the database.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkshopError};

/// Role of the caller performing an operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access
    Viewer,

    /// Step writes, intervention lifecycle, task create/assign
    #[default]
    Technician,

    /// Everything, including the bulk purge of archived tasks
    Admin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "technician" => Ok(Role::Technician),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl Role {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Technician => "technician",
            Role::Admin => "admin",
        }
    }
}

/// The caller identity attached to every workshop operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actor {
    pub role: Role,
}

impl Actor {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Grants step writes, intervention lifecycle, task create/assign and
    /// photo registration.
    pub fn require_technician(&self, action: &str) -> Result<()> {
        match self.role {
            Role::Technician | Role::Admin => Ok(()),
            Role::Viewer => Err(self.denied(action)),
        }
    }

    /// Grants cancel, archive/unarchive and the bulk purge.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Viewer | Role::Technician => Err(self.denied(action)),
        }
    }

    fn denied(&self, action: &str) -> WorkshopError {
        WorkshopError::PermissionDenied {
            role: self.role.as_str().into(),
            action: action.into(),
        }
    }
}

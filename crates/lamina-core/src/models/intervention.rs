//! Intervention model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{InterventionStatus, Step};

/// One workflow execution instance bound to exactly one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Intervention {
    /// Unique identifier for the intervention
    pub id: u64,

    /// ID of the owning task
    pub task_id: u64,

    /// Current status of the intervention
    #[serde(default)]
    pub status: InterventionStatus,

    /// Weather conditions recorded at start
    pub weather: Option<String>,

    /// Work location (bay, address, ...)
    pub location: Option<String>,

    /// Vehicle zones receiving film (hood, fenders, bumper, ...)
    #[serde(default)]
    pub zones: Vec<String>,

    /// Timestamp when work started (UTC)
    pub started_at: Option<Timestamp>,

    /// Timestamp when finalization validated (UTC)
    pub completed_at: Option<Timestamp>,

    /// Timestamp when the intervention row was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last modification (UTC)
    pub updated_at: Timestamp,

    /// Ordered steps of this intervention (by step_number ascending)
    #[serde(default)]
    pub steps: Vec<Step>,
}

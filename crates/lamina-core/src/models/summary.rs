//! Task summary and sync report types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Intervention, Task, TaskStatus};

/// Summary information about a task with step statistics from its latest
/// intervention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task ID
    pub id: u64,
    /// Vehicle manufacturer
    pub vehicle_make: String,
    /// Vehicle model
    pub vehicle_model: String,
    /// Registration plate
    pub vehicle_plate: String,
    /// Customer full name
    pub customer_name: String,
    /// Task status
    pub status: TaskStatus,
    /// Assigned technician, if any
    pub technician: Option<String>,
    /// Scheduled date of the work session
    pub scheduled_at: Option<Timestamp>,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of steps in the latest intervention
    pub total_steps: u32,
    /// Number of settled (completed or skipped) steps
    pub settled_steps: u32,
}

impl TaskSummary {
    /// Completion percentage over the latest intervention.
    /// Zero when the task has no intervention yet.
    pub fn completion_percentage(&self) -> u8 {
        crate::workflow::completion_percentage(self.settled_steps, self.total_steps)
    }
}

/// Result of reconciling a task's status with its workflow state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// The task after reconciliation
    pub task: Task,

    /// The latest intervention, if the task has one
    pub intervention: Option<Intervention>,

    /// round(100 × settled / total); 0 without an intervention
    pub completion_percentage: u8,

    /// When this sync ran (UTC)
    pub synced_at: Timestamp,
}

//! Task model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Intervention, TaskStatus};

/// Represents a customer work order for one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// Vehicle manufacturer
    pub vehicle_make: String,

    /// Vehicle model
    pub vehicle_model: String,

    /// Registration plate
    pub vehicle_plate: String,

    /// Customer full name
    pub customer_name: String,

    /// Customer phone number
    pub customer_phone: Option<String>,

    /// Scheduled date of the work session (UTC)
    pub scheduled_at: Option<Timestamp>,

    /// Status of the task
    #[serde(default)]
    pub status: TaskStatus,

    /// Assigned technician name, if any
    pub technician: Option<String>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last modified (UTC)
    pub updated_at: Timestamp,

    /// Associated interventions, newest first (lazy-loaded by default)
    #[serde(default)]
    pub interventions: Vec<Intervention>,
}

impl Task {
    /// Short vehicle label used across display contexts.
    pub fn vehicle_label(&self) -> String {
        format!(
            "{} {} ({})",
            self.vehicle_make, self.vehicle_model, self.vehicle_plate
        )
    }
}

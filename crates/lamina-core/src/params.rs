//! Parameter structures for Lamina operations
//!
//! Shared parameter structures usable across interfaces (CLI, MCP) without
//! framework-specific derives. Interface layers wrap these with their own
//! derives (clap::Args, schemars::JsonSchema) and convert via `From`, so the
//! core stays framework-agnostic while each boundary adds what it needs.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::TaskStatus;

/// Generic parameters for operations requiring just an ID.
///
/// Used for show_task, sync_task, cancel, archive/unarchive, show_step,
/// advance_step, pause/resume and similar single-target operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new task (order intake).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTask {
    /// Vehicle manufacturer (required)
    pub vehicle_make: String,
    /// Vehicle model (required)
    pub vehicle_model: String,
    /// Registration plate (required)
    pub vehicle_plate: String,
    /// Customer full name (required)
    pub customer_name: String,
    /// Optional customer phone number
    pub customer_phone: Option<String>,
    /// Optional scheduled date, RFC 3339 (e.g. 2026-09-01T09:00:00Z)
    pub scheduled_at: Option<String>,
    /// Optional technician to assign immediately
    pub technician: Option<String>,
}

impl CreateTask {
    /// Parse and validate the scheduled date, if provided.
    pub fn parse_scheduled_at(&self) -> crate::Result<Option<jiff::Timestamp>> {
        match &self.scheduled_at {
            None => Ok(None),
            Some(raw) => raw
                .parse::<jiff::Timestamp>()
                .map(Some)
                .map_err(|e| crate::WorkshopError::InvalidInput {
                    field: "scheduled_at".into(),
                    reason: format!("Not an RFC 3339 timestamp: {e}"),
                }),
        }
    }
}

/// Parameters for listing tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// Show archived tasks instead of active ones
    #[serde(default)]
    pub archived: bool,
    /// Filter by a specific status
    pub status: Option<TaskStatus>,
    /// Filter by assigned technician (exact match)
    pub technician: Option<String>,
    /// Filter by registration plate (partial match)
    pub plate: Option<String>,
}

/// Parameters for assigning a technician to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AssignTechnician {
    /// ID of the task
    pub task_id: u64,
    /// Technician name
    pub technician: String,
}

/// Parameters for the admin bulk purge of archived tasks.
///
/// Deletion is permanent and requires explicit confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PurgeTasks {
    /// Must be true; guards against accidental permanent deletion
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for starting an intervention on a task.
///
/// Instantiates the step template (inspection, preparation, installation,
/// finalization) and activates the first step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartIntervention {
    /// ID of the task to start work on
    pub task_id: u64,
    /// Weather conditions at start
    pub weather: Option<String>,
    /// Work location (bay, address, ...)
    pub location: Option<String>,
    /// Vehicle zones receiving film
    #[serde(default)]
    pub zones: Vec<String>,
}

/// Parameters for saving a partial step draft.
///
/// `data` merges deep into the stored collected_data; `photo_urls` union
/// with the stored list in first-seen order. Nothing is required to be
/// complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SaveStepDraft {
    /// ID of the step to update
    pub step_id: u64,
    /// Partial field map to merge into collected_data
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Photo URLs to union into the step's list
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Parameters for skipping a step with a recorded reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SkipStep {
    /// ID of the step to skip
    pub step_id: u64,
    /// Free-text reason, recorded on the step (required)
    pub reason: String,
}

impl SkipStep {
    /// Reject empty skip reasons.
    pub fn validate(&self) -> crate::Result<()> {
        if self.reason.trim().is_empty() {
            return Err(crate::WorkshopError::InvalidInput {
                field: "reason".into(),
                reason: "A skip reason is required".into(),
            });
        }
        Ok(())
    }
}

/// Parameters for registering a photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AttachPhoto {
    /// ID of the owning task
    pub task_id: u64,
    /// Optional intervention association
    pub intervention_id: Option<u64>,
    /// Optional step association
    pub step_id: Option<u64>,
    /// Photo kind: 'before', 'during' or 'after'
    pub kind: String,
    /// Storage path or URL
    pub path: String,
    /// Optional caption
    pub caption: Option<String>,
}

impl AttachPhoto {
    /// Parse and validate the photo kind.
    pub fn parse_kind(&self) -> crate::Result<crate::models::PhotoKind> {
        self.kind
            .parse()
            .map_err(|_| crate::WorkshopError::InvalidInput {
                field: "kind".into(),
                reason: format!("Invalid photo kind: {}. Must be 'before', 'during' or 'after'", self.kind),
            })
    }
}

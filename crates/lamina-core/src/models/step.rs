//! Step model definition and advance outcome.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{StepKind, StepStatus};

/// Represents an ordered phase within an intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step
    pub id: u64,

    /// ID of the parent intervention
    pub intervention_id: u64,

    /// Position within the intervention, unique and ascending
    pub step_number: u32,

    /// Which phase of the workflow this step is
    pub kind: StepKind,

    /// Current status of the step
    pub status: StepStatus,

    /// Free-form draft data collected by the technician
    #[serde(default)]
    pub collected_data: Map<String, Value>,

    /// Photo URLs attached to this step, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,

    /// Reason recorded when the step was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    /// Timestamp when the step validated (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// Timestamp when the step was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the step was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Step {
    /// Boolean checklist entries from the collected data, if any.
    ///
    /// The draft convention stores checklist items as a JSON object under
    /// the `checklist` key; a required item is satisfied when its value is
    /// exactly `true`.
    pub fn checklist_value(&self, key: &str) -> Option<&Value> {
        self.collected_data
            .get("checklist")
            .and_then(Value::as_object)
            .and_then(|c| c.get(key))
    }
}

/// Outcome of a successful advance or skip operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    /// The step that was completed or skipped
    pub step: Step,

    /// The newly activated step, if one remains
    pub next_step: Option<Step>,

    /// True when no unsettled step remains in the intervention
    pub workflow_complete: bool,
}

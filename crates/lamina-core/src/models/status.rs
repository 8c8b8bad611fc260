//! Status and kind enumerations for tasks, interventions, steps and photos.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of task statuses.
///
/// Appears in filter parameters, so it carries the schema derive the
/// parameter structs rely on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Order received, no technician assigned yet
    #[default]
    Pending,

    /// Technician assigned, work not started
    Assigned,

    /// An intervention is underway
    InProgress,

    /// All workflow steps settled
    Completed,

    /// Order cancelled before completion
    Cancelled,

    /// Hidden from normal views, restorable
    Archived,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "assigned" => Ok(TaskStatus::Assigned),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            "archived" => Ok(TaskStatus::Archived),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Archived => "archived",
        }
    }
}

/// Type-safe enumeration of intervention statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    /// Created but no step activated yet
    #[default]
    Pending,

    /// Steps are being worked through
    InProgress,

    /// Work suspended, resumable only back to in_progress
    Paused,

    /// Only the finalization step remains unsettled
    Finalizing,

    /// Every step is settled and finalization validated
    Completed,
}

impl FromStr for InterventionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InterventionStatus::Pending),
            "in_progress" | "inprogress" => Ok(InterventionStatus::InProgress),
            "paused" => Ok(InterventionStatus::Paused),
            "finalizing" => Ok(InterventionStatus::Finalizing),
            "completed" => Ok(InterventionStatus::Completed),
            _ => Err(format!("Invalid intervention status: {s}")),
        }
    }
}

impl InterventionStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "pending",
            InterventionStatus::InProgress => "in_progress",
            InterventionStatus::Paused => "paused",
            InterventionStatus::Finalizing => "finalizing",
            InterventionStatus::Completed => "completed",
        }
    }
}

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step has not been activated yet
    #[default]
    Pending,

    /// Step is the active one being worked on
    InProgress,

    /// Step validated and completed
    Completed,

    /// Step explicitly marked failed
    Failed,

    /// Step skipped with a recorded reason
    Skipped,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            "skipped" => Ok(StepStatus::Skipped),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }

    /// A settled step counts toward workflow completion.
    pub fn is_settled(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Pending => "○ Pending",
            StepStatus::Failed => "✗ Failed",
            StepStatus::Skipped => "⤼ Skipped",
        }
    }
}

/// The fixed template of workflow step kinds, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Inspection,
    Preparation,
    Installation,
    Finalization,
}

impl StepKind {
    /// The default workflow template, in step_number order.
    pub const TEMPLATE: [StepKind; 4] = [
        StepKind::Inspection,
        StepKind::Preparation,
        StepKind::Installation,
        StepKind::Finalization,
    ];

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Inspection => "inspection",
            StepKind::Preparation => "preparation",
            StepKind::Installation => "installation",
            StepKind::Finalization => "finalization",
        }
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inspection" => Ok(StepKind::Inspection),
            "preparation" => Ok(StepKind::Preparation),
            "installation" => Ok(StepKind::Installation),
            "finalization" => Ok(StepKind::Finalization),
            _ => Err(format!("Invalid step kind: {s}")),
        }
    }
}

/// Photo type tag relative to the installation work.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhotoKind {
    #[default]
    Before,
    During,
    After,
}

impl PhotoKind {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoKind::Before => "before",
            PhotoKind::During => "during",
            PhotoKind::After => "after",
        }
    }
}

impl FromStr for PhotoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" => Ok(PhotoKind::Before),
            "during" => Ok(PhotoKind::During),
            "after" => Ok(PhotoKind::After),
            _ => Err(format!("Invalid photo kind: {s}")),
        }
    }
}

//! Filter types for querying tasks.

use super::TaskStatus;

/// Filter options for querying tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Filter by a specific status
    pub status: Option<TaskStatus>,

    /// Filter by assigned technician (exact match)
    pub technician: Option<String>,

    /// Filter by registration plate (case-insensitive partial match)
    pub plate_contains: Option<String>,

    /// Show archived tasks as well
    pub include_archived: bool,
}

impl From<&crate::params::ListTasks> for TaskFilter {
    fn from(params: &crate::params::ListTasks) -> Self {
        if params.archived {
            Self {
                status: Some(TaskStatus::Archived),
                technician: params.technician.clone(),
                plate_contains: params.plate.clone(),
                include_archived: true,
            }
        } else {
            Self {
                status: params.status,
                technician: params.technician.clone(),
                plate_contains: params.plate.clone(),
                include_archived: false,
            }
        }
    }
}

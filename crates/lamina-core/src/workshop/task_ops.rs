//! Task operations for the Workshop.

use tokio::task;

use super::Workshop;
use crate::{
    db::Database,
    display::TaskSummaries,
    error::{Result, WorkshopError},
    models::{SyncReport, Task, TaskFilter},
    params::{AssignTechnician, CreateTask, Id, ListTasks, PurgeTasks},
};

impl Workshop {
    /// Creates a new task (order intake). Requires a technician or admin
    /// role.
    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        self.actor.require_technician("create tasks")?;

        let scheduled_at = params.parse_scheduled_at()?;

        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_task(
                &params.vehicle_make,
                &params.vehicle_model,
                &params.vehicle_plate,
                &params.customer_name,
                params.customer_phone.as_deref(),
                scheduled_at,
                params.technician.as_deref(),
            )
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a task by its ID with interventions and steps loaded.
    pub async fn get_task(&self, params: &Id) -> Result<Option<Task>> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists task summaries with the filters from the parameters.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<TaskSummaries> {
        let filter = TaskFilter::from(params);
        let db_path = self.db_path.clone();

        let summaries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_tasks(Some(&filter))
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(TaskSummaries(summaries))
    }

    /// Assigns a technician to a task. Requires a technician or admin role.
    pub async fn assign_technician(&self, params: &AssignTechnician) -> Result<Task> {
        self.actor.require_technician("assign technicians")?;

        if params.technician.trim().is_empty() {
            return Err(WorkshopError::invalid_input(
                "technician",
                "Technician name must not be empty",
            ));
        }

        let db_path = self.db_path.clone();
        let task_id = params.task_id;
        let technician = params.technician.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.assign_technician(task_id, &technician)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Cancels a task before completion. Admin only.
    pub async fn cancel_task(&self, params: &Id) -> Result<Task> {
        self.actor.require_admin("cancel tasks")?;

        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.cancel_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Archives a task (soft delete). Admin only.
    pub async fn archive_task(&self, params: &Id) -> Result<Task> {
        self.actor.require_admin("archive tasks")?;

        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.archive_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Restores an archived task. Admin only.
    pub async fn unarchive_task(&self, params: &Id) -> Result<Task> {
        self.actor.require_admin("unarchive tasks")?;

        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.unarchive_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes all archived tasks. Admin only, and requires
    /// the explicit confirmation flag. Returns the number of tasks removed.
    /// This operation cannot be undone.
    pub async fn purge_archived_tasks(&self, params: &PurgeTasks) -> Result<u64> {
        self.actor.require_admin("purge archived tasks")?;

        // Check confirmation flag first
        if !params.confirmed {
            return Err(WorkshopError::invalid_input(
                "confirmed",
                "Purging archived tasks is permanent. Set 'confirmed' to true to proceed.",
            ));
        }

        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.purge_archived_tasks()
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Reconciles a task's status with its workflow state and returns the
    /// sync report. Requires a technician or admin role since it may write
    /// the task status.
    pub async fn sync_task(&self, params: &Id) -> Result<SyncReport> {
        self.actor.require_technician("sync tasks")?;

        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.sync_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

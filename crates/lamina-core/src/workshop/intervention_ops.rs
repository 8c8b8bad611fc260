//! Intervention lifecycle operations for the Workshop.

use tokio::task;

use super::Workshop;
use crate::{
    db::Database,
    error::{Result, WorkshopError},
    models::Intervention,
    params::{Id, StartIntervention},
};

impl Workshop {
    /// Starts an intervention on a task: creates it from the step template
    /// and activates the first step. Requires a technician or admin role.
    pub async fn start_intervention(&self, params: &StartIntervention) -> Result<Intervention> {
        self.actor.require_technician("start interventions")?;

        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.start_intervention(
                params.task_id,
                params.weather.as_deref(),
                params.location.as_deref(),
                &params.zones,
            )
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves an intervention by its ID with steps loaded.
    pub async fn get_intervention(&self, params: &Id) -> Result<Option<Intervention>> {
        let db_path = self.db_path.clone();
        let intervention_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_intervention(intervention_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Shows the latest intervention of a task with its steps, or None if
    /// work has not started yet. The parameter ID is the task's.
    pub async fn show_active_intervention(&self, params: &Id) -> Result<Option<Intervention>> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.latest_intervention_for_task(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Suspends an in-progress intervention. Requires a technician or
    /// admin role.
    pub async fn pause_intervention(&self, params: &Id) -> Result<Intervention> {
        self.actor.require_technician("pause interventions")?;

        let db_path = self.db_path.clone();
        let intervention_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.pause_intervention(intervention_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Resumes a paused intervention. Requires a technician or admin role.
    pub async fn resume_intervention(&self, params: &Id) -> Result<Intervention> {
        self.actor.require_technician("resume interventions")?;

        let db_path = self.db_path.clone();
        let intervention_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.resume_intervention(intervention_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

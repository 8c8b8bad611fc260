//! Photo registry operations for the Workshop.

use tokio::task;

use super::Workshop;
use crate::{
    db::Database,
    display::Photos,
    error::{Result, WorkshopError},
    models::Photo,
    params::{AttachPhoto, Id},
};

impl Workshop {
    /// Registers a photo against a task (optionally an intervention and/or
    /// step). Requires a technician or admin role.
    pub async fn attach_photo(&self, params: &AttachPhoto) -> Result<Photo> {
        self.actor.require_technician("attach photos")?;

        let kind = params.parse_kind()?;
        if params.path.trim().is_empty() {
            return Err(WorkshopError::invalid_input(
                "path",
                "Photo path must not be empty",
            ));
        }

        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.attach_photo(
                params.task_id,
                params.intervention_id,
                params.step_id,
                kind,
                &params.path,
                params.caption.as_deref(),
            )
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists all photos registered against a task. The parameter ID is the
    /// task's.
    pub async fn list_photos(&self, params: &Id) -> Result<Photos> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        let photos = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_photos(task_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Photos(photos))
    }
}

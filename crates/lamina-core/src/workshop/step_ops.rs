//! Step operations for the Workshop: show, list, draft save, advance and
//! skip.

use tokio::task;

use super::Workshop;
use crate::{
    db::Database,
    display::Steps,
    error::{Result, WorkshopError},
    models::{AdvanceOutcome, Step},
    params::{Id, SaveStepDraft, SkipStep},
};

impl Workshop {
    /// Retrieves a step by its ID.
    pub async fn get_step(&self, params: &Id) -> Result<Option<Step>> {
        let db_path = self.db_path.clone();
        let step_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_step(step_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists the steps of the task's latest intervention in order. The
    /// parameter ID is the task's.
    pub async fn list_steps(&self, params: &Id) -> Result<Steps> {
        let intervention = self.show_active_intervention(params).await?;
        Ok(Steps(
            intervention.map(|i| i.steps).unwrap_or_default(),
        ))
    }

    /// Merges a partial draft into a step without requiring completeness.
    /// Requires a technician or admin role.
    pub async fn save_step_draft(&self, params: &SaveStepDraft) -> Result<Step> {
        self.actor.require_technician("save step drafts")?;

        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.save_step_draft(params.step_id, &params.data, &params.photo_urls)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Validates the step's draft against its completion rule and, on
    /// pass, marks it completed and activates the next step. Requires a
    /// technician or admin role.
    ///
    /// On failure the returned [`WorkshopError::ValidationFailed`] carries
    /// the exact unmet condition names and nothing is persisted.
    pub async fn advance_step(&self, params: &Id) -> Result<AdvanceOutcome> {
        self.actor.require_technician("advance steps")?;

        let db_path = self.db_path.clone();
        let step_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.advance_step(step_id)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Skips a step with a recorded reason, advancing activation exactly
    /// like a completion. Requires a technician or admin role.
    pub async fn skip_step(&self, params: &SkipStep) -> Result<AdvanceOutcome> {
        self.actor.require_technician("skip steps")?;
        params.validate()?;

        let db_path = self.db_path.clone();
        let step_id = params.step_id;
        let reason = params.reason.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.skip_step(step_id, &reason)
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

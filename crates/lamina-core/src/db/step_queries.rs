//! Step queries: draft saves, validation/advance and skip.
//!
//! Advance and skip settle a step, activate the next pending one and
//! reconcile the owning intervention's status within one transaction.
//! Task status is reconciled separately by [`super::Database::sync_task`].

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, WorkshopError},
    models::{AdvanceOutcome, Intervention, InterventionStatus, Step, StepKind, StepStatus},
    workflow,
};

use super::intervention_queries;

// Optimized SQL queries as const strings for compile-time optimization
const SELECT_STEP_SQL: &str = "SELECT id, intervention_id, step_number, kind, status, collected_data, photo_urls, skip_reason, completed_at, created_at, updated_at FROM steps WHERE id = ?1";
const SELECT_STEPS_BY_INTERVENTION_SQL: &str = "SELECT id, intervention_id, step_number, kind, status, collected_data, photo_urls, skip_reason, completed_at, created_at, updated_at FROM steps WHERE intervention_id = ?1 ORDER BY step_number";
const UPDATE_STEP_DRAFT_SQL: &str =
    "UPDATE steps SET collected_data = ?1, photo_urls = ?2, updated_at = ?3 WHERE id = ?4";
const UPDATE_STEP_COMPLETED_SQL: &str =
    "UPDATE steps SET status = 'completed', completed_at = ?1, updated_at = ?1 WHERE id = ?2";
const UPDATE_STEP_SKIPPED_SQL: &str =
    "UPDATE steps SET status = 'skipped', skip_reason = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_STEP_ACTIVATE_SQL: &str =
    "UPDATE steps SET status = 'in_progress', updated_at = ?1 WHERE id = ?2";

/// Helper function to construct a Step from a database row.
pub(super) fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
    let kind_str: String = row.get(3)?;
    let kind = kind_str.parse::<StepKind>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("Invalid step kind: {kind_str}").into(),
        )
    })?;

    let status_str: String = row.get(4)?;
    let status = status_str.parse::<StepStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("Invalid step status: {status_str}").into(),
        )
    })?;

    let collected_str: String = row.get(5)?;
    let collected_data = serde_json::from_str(&collected_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let photos_str: String = row.get(6)?;
    let photo_urls: Vec<String> = serde_json::from_str(&photos_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    let completed_at = row
        .get::<_, Option<String>>(8)?
        .map(|s| {
            s.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
            })
        })
        .transpose()?;

    Ok(Step {
        id: row.get::<_, i64>(0)? as u64,
        intervention_id: row.get::<_, i64>(1)? as u64,
        step_number: row.get::<_, i64>(2)? as u32,
        kind,
        status,
        collected_data,
        photo_urls,
        skip_reason: row.get(7)?,
        completed_at,
        created_at: row
            .get::<_, String>(9)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?,
        updated_at: row
            .get::<_, String>(10)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?,
    })
}

/// Fetch a step row by ID.
pub(super) fn step_by_id(conn: &Connection, id: u64) -> rusqlite::Result<Option<Step>> {
    conn.query_row(SELECT_STEP_SQL, params![id as i64], build_step_from_row)
        .optional()
}

/// All steps of an intervention, by step_number ascending.
pub(super) fn steps_for_intervention(
    conn: &Connection,
    intervention_id: u64,
) -> rusqlite::Result<Vec<Step>> {
    let mut stmt = conn.prepare(SELECT_STEPS_BY_INTERVENTION_SQL)?;
    let steps = stmt
        .query_map(params![intervention_id as i64], build_step_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(steps)
}

/// Activate the next pending step if no step is active, returning the
/// newly activated step.
fn activate_next_pending(
    conn: &Connection,
    intervention_id: u64,
    now: Timestamp,
) -> rusqlite::Result<Option<Step>> {
    let steps = steps_for_intervention(conn, intervention_id)?;

    if steps.iter().any(|s| s.status == StepStatus::InProgress) {
        return Ok(None);
    }

    let next = match steps.into_iter().find(|s| s.status == StepStatus::Pending) {
        Some(step) => step,
        None => return Ok(None),
    };

    conn.execute(
        UPDATE_STEP_ACTIVATE_SQL,
        params![now.to_string(), next.id as i64],
    )?;

    Ok(step_by_id(conn, next.id)?)
}

impl super::Database {
    /// Retrieves a step by its ID.
    pub fn get_step(&self, id: u64) -> Result<Option<Step>> {
        step_by_id(&self.connection, id)
            .map_err(|e| WorkshopError::database_error("Failed to query step", e))
    }

    /// Merges a partial draft into a step and persists it.
    ///
    /// `data` is deep-merged into the stored collected_data (objects merge
    /// recursively, everything else is overwritten) and `photo_urls` are
    /// unioned in first-seen order. Nothing is required to be complete, and
    /// identical repeated saves are idempotent. Settled steps reject drafts.
    pub fn save_step_draft(
        &mut self,
        step_id: u64,
        data: &serde_json::Map<String, serde_json::Value>,
        photo_urls: &[String],
    ) -> Result<Step> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let step = step_by_id(&tx, step_id)
            .map_err(|e| WorkshopError::database_error("Failed to query step", e))?
            .ok_or(WorkshopError::StepNotFound { id: step_id })?;

        if step.status.is_settled() {
            return Err(WorkshopError::invalid_input(
                "step_id",
                format!(
                    "Step {step_id} is already {} and no longer accepts drafts",
                    step.status.as_str()
                ),
            ));
        }

        let mut merged = step.collected_data.clone();
        workflow::merge_collected_data(&mut merged, data.clone());
        let mut urls = step.photo_urls.clone();
        workflow::union_photo_urls(&mut urls, photo_urls);

        let now = Timestamp::now();
        tx.execute(
            UPDATE_STEP_DRAFT_SQL,
            params![
                serde_json::to_string(&merged)?,
                serde_json::to_string(&urls)?,
                now.to_string(),
                step_id as i64
            ],
        )
        .map_err(|e| WorkshopError::database_error("Failed to save step draft", e))?;

        let updated = step_by_id(&tx, step_id)
            .map_err(|e| WorkshopError::database_error("Failed to query updated step", e))?
            .ok_or(WorkshopError::StepNotFound { id: step_id })?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Validates the active step's draft against its kind's completion
    /// rule and, on pass, settles it and activates the next step.
    ///
    /// On failure nothing is persisted and the error carries the exact
    /// unmet condition names.
    pub fn advance_step(&mut self, step_id: u64) -> Result<AdvanceOutcome> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let step = step_by_id(&tx, step_id)
            .map_err(|e| WorkshopError::database_error("Failed to query step", e))?
            .ok_or(WorkshopError::StepNotFound { id: step_id })?;

        let intervention = Self::require_workable_intervention(&tx, &step)?;

        if step.status != StepStatus::InProgress {
            return Err(WorkshopError::invalid_input(
                "step_id",
                format!(
                    "Step {step_id} is {}, only the active step can advance",
                    step.status.as_str()
                ),
            ));
        }

        let rule = workflow::rule_for(step.kind);
        let unmet = workflow::evaluate(&rule, &step.collected_data, step.photo_urls.len());
        if !unmet.is_empty() {
            return Err(WorkshopError::ValidationFailed { conditions: unmet });
        }

        let now = Timestamp::now();
        tx.execute(
            UPDATE_STEP_COMPLETED_SQL,
            params![now.to_string(), step_id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to complete step", e))?;

        let outcome = Self::settle_outcome(&tx, intervention, step_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(outcome)
    }

    /// Skips a step with a recorded reason, without requiring photos or
    /// checklist data, and advances activation exactly like a completion.
    pub fn skip_step(&mut self, step_id: u64, reason: &str) -> Result<AdvanceOutcome> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let step = step_by_id(&tx, step_id)
            .map_err(|e| WorkshopError::database_error("Failed to query step", e))?
            .ok_or(WorkshopError::StepNotFound { id: step_id })?;

        let intervention = Self::require_workable_intervention(&tx, &step)?;

        if step.status.is_settled() {
            return Err(WorkshopError::invalid_input(
                "step_id",
                format!(
                    "Step {step_id} is already {} and cannot be skipped",
                    step.status.as_str()
                ),
            ));
        }

        let now = Timestamp::now();
        tx.execute(
            UPDATE_STEP_SKIPPED_SQL,
            params![reason, now.to_string(), step_id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to skip step", e))?;

        let outcome = Self::settle_outcome(&tx, intervention, step_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(outcome)
    }

    /// Loads the owning intervention and rejects writes while it is paused.
    fn require_workable_intervention(
        conn: &Connection,
        step: &Step,
    ) -> Result<Intervention> {
        let intervention = intervention_queries::intervention_by_id(conn, step.intervention_id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?
            .ok_or(WorkshopError::InterventionNotFound {
                id: step.intervention_id,
            })?;

        if intervention.status == InterventionStatus::Paused {
            return Err(WorkshopError::invalid_input(
                "step_id",
                format!(
                    "Intervention {} is paused, resume it before working on steps",
                    intervention.id
                ),
            ));
        }

        Ok(intervention)
    }

    /// Post-settle bookkeeping shared by advance and skip: activate the
    /// next pending step, reconcile the intervention status and assemble
    /// the outcome.
    fn settle_outcome(
        conn: &Connection,
        mut intervention: Intervention,
        step_id: u64,
        now: Timestamp,
    ) -> Result<AdvanceOutcome> {
        let next_step = activate_next_pending(conn, intervention.id, now)
            .map_err(|e| WorkshopError::database_error("Failed to activate next step", e))?;

        intervention.steps = steps_for_intervention(conn, intervention.id)
            .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;
        intervention_queries::reconcile_intervention_status(conn, &mut intervention, now)
            .map_err(|e| WorkshopError::database_error("Failed to update intervention status", e))?;

        let workflow_complete = intervention.status == InterventionStatus::Completed;

        let step = step_by_id(conn, step_id)
            .map_err(|e| WorkshopError::database_error("Failed to query settled step", e))?
            .ok_or(WorkshopError::StepNotFound { id: step_id })?;

        Ok(AdvanceOutcome {
            step,
            next_step,
            workflow_complete,
        })
    }
}

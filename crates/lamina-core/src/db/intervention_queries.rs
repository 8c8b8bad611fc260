//! Intervention lifecycle operations: start, pause/resume, lookups and
//! status reconciliation.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, WorkshopError},
    models::{Intervention, InterventionStatus, StepKind, StepStatus, TaskStatus},
    workflow,
};

use super::{step_queries, task_queries};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_INTERVENTION_SQL: &str = "INSERT INTO interventions (task_id, status, weather, location, zones, started_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_STEP_SQL: &str = "INSERT INTO steps (intervention_id, step_number, kind, status, collected_data, photo_urls, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, '{}', '[]', ?5, ?6)";
const SELECT_INTERVENTION_COLUMNS: &str = "id, task_id, status, weather, location, zones, started_at, completed_at, created_at, updated_at";
const SELECT_INTERVENTION_SQL: &str = "SELECT id, task_id, status, weather, location, zones, started_at, completed_at, created_at, updated_at FROM interventions WHERE id = ?1";
const CHECK_UNFINISHED_INTERVENTION_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM interventions WHERE task_id = ?1 AND status != 'completed')";
const UPDATE_INTERVENTION_STATUS_SQL: &str =
    "UPDATE interventions SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_INTERVENTION_COMPLETED_SQL: &str =
    "UPDATE interventions SET status = ?1, completed_at = ?2, updated_at = ?2 WHERE id = ?3";
const UPDATE_TASK_STATUS_SQL: &str = "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3";

/// Helper function to construct an Intervention from a database row (steps
/// not loaded).
pub(super) fn build_intervention_from_row(row: &rusqlite::Row) -> rusqlite::Result<Intervention> {
    let status_str: String = row.get(2)?;
    let status = status_str.parse::<InterventionStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("Invalid intervention status: {status_str}").into(),
        )
    })?;

    let zones_str: String = row.get(5)?;
    let zones: Vec<String> = serde_json::from_str(&zones_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let parse_opt_ts = |idx: usize, value: Option<String>| {
        value
            .map(|s| {
                s.parse::<Timestamp>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
                })
            })
            .transpose()
    };

    Ok(Intervention {
        id: row.get::<_, i64>(0)? as u64,
        task_id: row.get::<_, i64>(1)? as u64,
        status,
        weather: row.get(3)?,
        location: row.get(4)?,
        zones,
        started_at: parse_opt_ts(6, row.get(6)?)?,
        completed_at: parse_opt_ts(7, row.get(7)?)?,
        created_at: row
            .get::<_, String>(8)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?,
        updated_at: row
            .get::<_, String>(9)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?,
        steps: Vec::new(),
    })
}

/// Fetch an intervention row by ID (without steps).
pub(super) fn intervention_by_id(
    conn: &Connection,
    id: u64,
) -> rusqlite::Result<Option<Intervention>> {
    conn.query_row(
        SELECT_INTERVENTION_SQL,
        params![id as i64],
        build_intervention_from_row,
    )
    .optional()
}

/// All interventions of a task, newest first (without steps).
pub(super) fn interventions_for_task(
    conn: &Connection,
    task_id: u64,
) -> rusqlite::Result<Vec<Intervention>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_INTERVENTION_COLUMNS} FROM interventions WHERE task_id = ?1 ORDER BY id DESC"
    ))?;
    let interventions = stmt
        .query_map(params![task_id as i64], build_intervention_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(interventions)
}

/// The latest (highest-id) intervention of a task, if any (without steps).
pub(super) fn latest_intervention(
    conn: &Connection,
    task_id: u64,
) -> rusqlite::Result<Option<Intervention>> {
    conn.query_row(
        &format!(
            "SELECT {SELECT_INTERVENTION_COLUMNS} FROM interventions WHERE task_id = ?1 ORDER BY id DESC LIMIT 1"
        ),
        params![task_id as i64],
        build_intervention_from_row,
    )
    .optional()
}

/// Reconcile a loaded intervention's status with its steps and persist the
/// change, recording completed_at on completion.
///
/// A paused intervention is left alone; it returns to in_progress only via
/// an explicit resume. The passed intervention must have its steps loaded.
pub(super) fn reconcile_intervention_status(
    conn: &Connection,
    intervention: &mut Intervention,
    now: Timestamp,
) -> rusqlite::Result<()> {
    if intervention.status == InterventionStatus::Paused {
        return Ok(());
    }

    let derived = workflow::derive_intervention_status(&intervention.steps);
    if derived == intervention.status {
        return Ok(());
    }

    if derived == InterventionStatus::Completed {
        conn.execute(
            UPDATE_INTERVENTION_COMPLETED_SQL,
            params![derived.as_str(), now.to_string(), intervention.id as i64],
        )?;
        intervention.completed_at = Some(now);
    } else {
        conn.execute(
            UPDATE_INTERVENTION_STATUS_SQL,
            params![derived.as_str(), now.to_string(), intervention.id as i64],
        )?;
    }
    intervention.status = derived;
    intervention.updated_at = now;

    Ok(())
}

impl super::Database {
    /// Starts an intervention on a task: instantiates the step template
    /// (inspection, preparation, installation, finalization), activates the
    /// first step and moves the task to in_progress.
    ///
    /// A task can only carry one unfinished intervention at a time.
    pub fn start_intervention(
        &mut self,
        task_id: u64,
        weather: Option<&str>,
        location: Option<&str>,
        zones: &[String],
    ) -> Result<Intervention> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = task_queries::task_by_id(&tx, task_id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id: task_id })?;

        if matches!(task.status, TaskStatus::Cancelled | TaskStatus::Archived) {
            return Err(WorkshopError::invalid_input(
                "task_id",
                format!(
                    "Cannot start an intervention on a {} task",
                    task.status.as_str()
                ),
            ));
        }

        let has_unfinished: bool = tx
            .query_row(
                CHECK_UNFINISHED_INTERVENTION_SQL,
                params![task_id as i64],
                |row| row.get(0),
            )
            .map_err(|e| WorkshopError::database_error("Failed to check interventions", e))?;
        if has_unfinished {
            return Err(WorkshopError::invalid_input(
                "task_id",
                format!("Task {task_id} already has an unfinished intervention"),
            ));
        }

        let now = Timestamp::now();
        let now_str = now.to_string();
        let zones_json = serde_json::to_string(zones)?;

        tx.execute(
            INSERT_INTERVENTION_SQL,
            params![
                task_id as i64,
                InterventionStatus::InProgress.as_str(),
                weather,
                location,
                &zones_json,
                &now_str,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| WorkshopError::database_error("Failed to insert intervention", e))?;

        let intervention_id = tx.last_insert_rowid() as u64;

        // Instantiate the step template; the first step starts active.
        for (index, kind) in StepKind::TEMPLATE.iter().enumerate() {
            let status = if index == 0 {
                StepStatus::InProgress
            } else {
                StepStatus::Pending
            };
            tx.execute(
                INSERT_STEP_SQL,
                params![
                    intervention_id as i64,
                    (index + 1) as i64,
                    kind.as_str(),
                    status.as_str(),
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| WorkshopError::database_error("Failed to insert step", e))?;
        }

        tx.execute(
            UPDATE_TASK_STATUS_SQL,
            params![TaskStatus::InProgress.as_str(), &now_str, task_id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to update task status", e))?;

        let mut intervention = intervention_by_id(&tx, intervention_id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?
            .ok_or(WorkshopError::InterventionNotFound {
                id: intervention_id,
            })?;
        intervention.steps = step_queries::steps_for_intervention(&tx, intervention_id)
            .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(intervention)
    }

    /// Retrieves an intervention by its ID with steps eagerly loaded.
    pub fn get_intervention(&self, id: u64) -> Result<Option<Intervention>> {
        let mut intervention = intervention_by_id(&self.connection, id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?;

        if let Some(ref mut intervention) = intervention {
            intervention.steps =
                step_queries::steps_for_intervention(&self.connection, intervention.id)
                    .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;
        }

        Ok(intervention)
    }

    /// The latest intervention of a task, with steps. None when the task
    /// has no intervention yet.
    pub fn latest_intervention_for_task(&self, task_id: u64) -> Result<Option<Intervention>> {
        let exists: bool = self
            .connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
                params![task_id as i64],
                |row| row.get(0),
            )
            .map_err(|e| WorkshopError::database_error("Failed to check task existence", e))?;
        if !exists {
            return Err(WorkshopError::TaskNotFound { id: task_id });
        }

        let mut intervention = latest_intervention(&self.connection, task_id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?;

        if let Some(ref mut intervention) = intervention {
            intervention.steps =
                step_queries::steps_for_intervention(&self.connection, intervention.id)
                    .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;
        }

        Ok(intervention)
    }

    /// Suspends an in-progress intervention.
    pub fn pause_intervention(&mut self, id: u64) -> Result<Intervention> {
        self.transition_intervention(id, InterventionStatus::Paused, InterventionStatus::InProgress)
    }

    /// Resumes a paused intervention back to in_progress.
    pub fn resume_intervention(&mut self, id: u64) -> Result<Intervention> {
        self.transition_intervention(id, InterventionStatus::InProgress, InterventionStatus::Paused)
    }

    fn transition_intervention(
        &mut self,
        id: u64,
        target: InterventionStatus,
        required: InterventionStatus,
    ) -> Result<Intervention> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let intervention = intervention_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?
            .ok_or(WorkshopError::InterventionNotFound { id })?;

        if intervention.status != required {
            return Err(WorkshopError::invalid_input(
                "id",
                format!(
                    "Intervention {id} is '{}', expected '{}'",
                    intervention.status.as_str(),
                    required.as_str()
                ),
            ));
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_INTERVENTION_STATUS_SQL,
            params![target.as_str(), &now, id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to update intervention status", e))?;

        let mut updated = intervention_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query updated intervention", e))?
            .ok_or(WorkshopError::InterventionNotFound { id })?;
        updated.steps = step_queries::steps_for_intervention(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }
}

//! Task CRUD operations, filtering and task–workflow synchronization.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, WorkshopError},
    models::{SyncReport, Task, TaskFilter, TaskStatus, TaskSummary},
    workflow,
};

use super::{intervention_queries, step_queries};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (vehicle_make, vehicle_model, vehicle_plate, customer_name, customer_phone, scheduled_at, status, technician, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const SELECT_TASK_SQL: &str = "SELECT id, vehicle_make, vehicle_model, vehicle_plate, customer_name, customer_phone, scheduled_at, status, technician, created_at, updated_at FROM tasks WHERE id = ?1";
const CHECK_TASK_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";
const UPDATE_TASK_STATUS_SQL: &str = "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_TASK_TECHNICIAN_SQL: &str =
    "UPDATE tasks SET technician = ?1, status = ?2, updated_at = ?3 WHERE id = ?4";
const SELECT_ARCHIVED_TASK_IDS_SQL: &str = "SELECT id FROM tasks WHERE status = 'archived'";
const DELETE_TASK_PHOTOS_SQL: &str = "DELETE FROM photos WHERE task_id = ?1";
const DELETE_TASK_STEPS_SQL: &str =
    "DELETE FROM steps WHERE intervention_id IN (SELECT id FROM interventions WHERE task_id = ?1)";
const DELETE_TASK_INTERVENTIONS_SQL: &str = "DELETE FROM interventions WHERE task_id = ?1";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

// Base queries for task listing
const TASK_SUMMARY_COLUMNS: &str = "id, vehicle_make, vehicle_model, vehicle_plate, customer_name, scheduled_at, status, technician, created_at, updated_at, total_steps, settled_steps";
const TASK_SUMMARIES_VIEW: &str = "task_summaries";
const ALL_TASK_SUMMARIES_VIEW: &str = "all_task_summaries";

/// Helper function to construct a Task from a database row (interventions
/// not loaded).
pub(super) fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let status_str: String = row.get(7)?;
    let status = status_str.parse::<TaskStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Text,
            format!("Invalid task status: {status_str}").into(),
        )
    })?;

    let scheduled_at = row
        .get::<_, Option<String>>(6)?
        .map(|s| {
            s.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
            })
        })
        .transpose()?;

    Ok(Task {
        id: row.get::<_, i64>(0)? as u64,
        vehicle_make: row.get(1)?,
        vehicle_model: row.get(2)?,
        vehicle_plate: row.get(3)?,
        customer_name: row.get(4)?,
        customer_phone: row.get(5)?,
        scheduled_at,
        status,
        technician: row.get(8)?,
        created_at: row
            .get::<_, String>(9)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?,
        updated_at: row
            .get::<_, String>(10)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?,
        interventions: Vec::new(),
    })
}

/// Fetch a task row by ID (without interventions).
pub(super) fn task_by_id(conn: &Connection, id: u64) -> rusqlite::Result<Option<Task>> {
    conn.query_row(SELECT_TASK_SQL, params![id as i64], build_task_from_row)
        .optional()
}

impl super::Database {
    /// Creates a new task (order intake).
    ///
    /// A task with a technician starts in `assigned`, otherwise `pending`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_task(
        &mut self,
        vehicle_make: &str,
        vehicle_model: &str,
        vehicle_plate: &str,
        customer_name: &str,
        customer_phone: Option<&str>,
        scheduled_at: Option<Timestamp>,
        technician: Option<&str>,
    ) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        let status = if technician.is_some() {
            TaskStatus::Assigned
        } else {
            TaskStatus::Pending
        };

        tx.execute(
            INSERT_TASK_SQL,
            params![
                vehicle_make,
                vehicle_model,
                vehicle_plate,
                customer_name,
                customer_phone,
                scheduled_at.map(|t| t.to_string()),
                status.as_str(),
                technician,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| WorkshopError::database_error("Failed to insert task", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Task {
            id,
            vehicle_make: vehicle_make.into(),
            vehicle_model: vehicle_model.into(),
            vehicle_plate: vehicle_plate.into(),
            customer_name: customer_name.into(),
            customer_phone: customer_phone.map(String::from),
            scheduled_at,
            status,
            technician: technician.map(String::from),
            created_at: now,
            updated_at: now,
            interventions: Vec::new(),
        })
    }

    /// Retrieves a task by its ID with interventions and steps eagerly
    /// loaded, newest intervention first.
    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        let mut task = task_by_id(&self.connection, id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?;

        if let Some(ref mut task) = task {
            task.interventions =
                intervention_queries::interventions_for_task(&self.connection, task.id)
                    .map_err(|e| {
                        WorkshopError::database_error("Failed to query interventions", e)
                    })?;
            for intervention in &mut task.interventions {
                intervention.steps =
                    step_queries::steps_for_intervention(&self.connection, intervention.id)
                        .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;
            }
        }

        Ok(task)
    }

    /// Lists task summaries with optional filtering.
    ///
    /// Summaries come from the summary views, which join each task with the
    /// step counts of its latest intervention.
    pub fn list_tasks(&self, filter: Option<&TaskFilter>) -> Result<Vec<TaskSummary>> {
        // Choose the appropriate view based on whether we want to include
        // archived tasks
        let view_name = if filter.as_ref().is_some_and(|f| f.include_archived) {
            ALL_TASK_SUMMARIES_VIEW
        } else {
            TASK_SUMMARIES_VIEW
        };

        let mut query = format!("SELECT {TASK_SUMMARY_COLUMNS} FROM {view_name}");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(ref status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }

            if let Some(ref technician) = f.technician {
                conditions.push("technician = ?");
                params_vec.push(Box::new(technician.clone()));
            }

            if let Some(ref plate) = f.plate_contains {
                conditions.push("vehicle_plate LIKE ?");
                params_vec.push(Box::new(format!("%{plate}%")));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| WorkshopError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], |row| {
                let status_str: String = row.get(6)?;
                let status = status_str.parse::<TaskStatus>().map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        6,
                        Type::Text,
                        format!("Invalid task status: {status_str}").into(),
                    )
                })?;

                let scheduled_at = row
                    .get::<_, Option<String>>(5)?
                    .map(|s| {
                        s.parse::<Timestamp>().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                        })
                    })
                    .transpose()?;

                Ok(TaskSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    vehicle_make: row.get(1)?,
                    vehicle_model: row.get(2)?,
                    vehicle_plate: row.get(3)?,
                    customer_name: row.get(4)?,
                    scheduled_at,
                    status,
                    technician: row.get(7)?,
                    created_at: row.get::<_, String>(8)?.parse::<Timestamp>().map_err(
                        |e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)),
                    )?,
                    updated_at: row.get::<_, String>(9)?.parse::<Timestamp>().map_err(
                        |e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)),
                    )?,
                    total_steps: row.get::<_, i64>(10)? as u32,
                    settled_steps: row.get::<_, i64>(11)? as u32,
                })
            })
            .map_err(|e| WorkshopError::database_error("Failed to query tasks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WorkshopError::database_error("Failed to fetch tasks", e))?;

        Ok(summaries)
    }

    /// Assigns a technician to a task.
    ///
    /// A pending task moves to `assigned`; other statuses keep their status
    /// and only the technician changes.
    pub fn assign_technician(&mut self, id: u64, technician: &str) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        let new_status = if task.status == TaskStatus::Pending {
            TaskStatus::Assigned
        } else {
            task.status
        };

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_TASK_TECHNICIAN_SQL,
            params![technician, new_status.as_str(), &now, id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to assign technician", e))?;

        let updated = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query updated task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Cancels a task before completion.
    ///
    /// Completed, archived or already cancelled tasks cannot be cancelled.
    pub fn cancel_task(&mut self, id: u64) -> Result<Task> {
        self.transition_task(id, TaskStatus::Cancelled, |current| {
            matches!(
                current,
                TaskStatus::Pending | TaskStatus::Assigned | TaskStatus::InProgress
            )
        })
    }

    /// Archives a task (soft delete): it disappears from normal listings
    /// but stays restorable.
    pub fn archive_task(&mut self, id: u64) -> Result<Task> {
        self.transition_task(id, TaskStatus::Archived, |current| {
            current != TaskStatus::Archived
        })
    }

    /// Restores an archived task. It returns to `assigned` when a
    /// technician is set, otherwise `pending`.
    pub fn unarchive_task(&mut self, id: u64) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        if task.status != TaskStatus::Archived {
            return Err(WorkshopError::invalid_input(
                "id",
                format!("Task {id} is not archived (status: {})", task.status.as_str()),
            ));
        }

        let restored = if task.technician.is_some() {
            TaskStatus::Assigned
        } else {
            TaskStatus::Pending
        };

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_TASK_STATUS_SQL,
            params![restored.as_str(), &now, id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to unarchive task", e))?;

        let updated = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query updated task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Permanently deletes all archived tasks with their interventions,
    /// steps and photos. Returns the number of tasks removed.
    /// This operation cannot be undone.
    pub fn purge_archived_tasks(&mut self) -> Result<u64> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let ids: Vec<i64> = {
            let mut stmt = tx
                .prepare(SELECT_ARCHIVED_TASK_IDS_SQL)
                .map_err(|e| WorkshopError::database_error("Failed to prepare query", e))?;
            let rows = stmt
                .query_map([], |row| row.get(0))
                .map_err(|e| WorkshopError::database_error("Failed to query archived tasks", e))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WorkshopError::database_error("Failed to fetch archived tasks", e))?
        };

        for id in &ids {
            tx.execute(DELETE_TASK_PHOTOS_SQL, params![id])
                .map_err(|e| WorkshopError::database_error("Failed to delete task photos", e))?;
            tx.execute(DELETE_TASK_STEPS_SQL, params![id])
                .map_err(|e| WorkshopError::database_error("Failed to delete task steps", e))?;
            tx.execute(DELETE_TASK_INTERVENTIONS_SQL, params![id])
                .map_err(|e| {
                    WorkshopError::database_error("Failed to delete task interventions", e)
                })?;
            tx.execute(DELETE_TASK_SQL, params![id])
                .map_err(|e| WorkshopError::database_error("Failed to delete task", e))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ids.len() as u64)
    }

    /// Reconciles a task's status with its latest intervention's step
    /// state and returns the full sync report.
    ///
    /// All steps settled moves the task to `completed`, any step
    /// in_progress moves it to `in_progress`, otherwise the status stays.
    /// The latest intervention's status is reconciled the same way unless
    /// it is paused.
    pub fn sync_task(&mut self, id: u64) -> Result<SyncReport> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        let mut intervention = intervention_queries::latest_intervention(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?;

        let now = Timestamp::now();
        let mut completion = 0;

        if let Some(ref mut intervention) = intervention {
            intervention.steps = step_queries::steps_for_intervention(&tx, intervention.id)
                .map_err(|e| WorkshopError::database_error("Failed to query steps", e))?;
            completion = workflow::steps_percentage(&intervention.steps);

            intervention_queries::reconcile_intervention_status(&tx, intervention, now)
                .map_err(|e| {
                    WorkshopError::database_error("Failed to update intervention status", e)
                })?;

            let projected = workflow::project_task_status(task.status, &intervention.steps);
            if projected != task.status {
                tx.execute(
                    UPDATE_TASK_STATUS_SQL,
                    params![projected.as_str(), now.to_string(), id as i64],
                )
                .map_err(|e| WorkshopError::database_error("Failed to update task status", e))?;
                task.status = projected;
                task.updated_at = now;
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(SyncReport {
            task,
            intervention,
            completion_percentage: completion,
            synced_at: now,
        })
    }

    /// Shared guarded status transition. `allowed` inspects the current
    /// status; a false result is an InvalidInput error.
    fn transition_task(
        &mut self,
        id: u64,
        target: TaskStatus,
        allowed: impl Fn(TaskStatus) -> bool,
    ) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TASK_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .map_err(|e| WorkshopError::database_error("Failed to check task existence", e))?;
        if !exists {
            return Err(WorkshopError::TaskNotFound { id });
        }

        let task = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        if !allowed(task.status) {
            return Err(WorkshopError::invalid_input(
                "id",
                format!(
                    "Task {id} cannot move from '{}' to '{}'",
                    task.status.as_str(),
                    target.as_str()
                ),
            ));
        }

        let now = Timestamp::now().to_string();
        tx.execute(
            UPDATE_TASK_STATUS_SQL,
            params![target.as_str(), &now, id as i64],
        )
        .map_err(|e| WorkshopError::database_error("Failed to update task status", e))?;

        let updated = task_by_id(&tx, id)
            .map_err(|e| WorkshopError::database_error("Failed to query updated task", e))?
            .ok_or(WorkshopError::TaskNotFound { id })?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }
}

//! Photo registry operations.
//!
//! Photos are tracked by storage path only; the files themselves are an
//! external concern. Step completion rules count the URLs saved on the
//! step draft, not rows in this registry.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, WorkshopError},
    models::{Photo, PhotoKind},
};

use super::{intervention_queries, step_queries, task_queries};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_PHOTO_SQL: &str = "INSERT INTO photos (task_id, intervention_id, step_id, kind, path, caption, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_PHOTO_SQL: &str = "SELECT id, task_id, intervention_id, step_id, kind, path, caption, created_at FROM photos WHERE id = ?1";
const SELECT_PHOTOS_BY_TASK_SQL: &str = "SELECT id, task_id, intervention_id, step_id, kind, path, caption, created_at FROM photos WHERE task_id = ?1 ORDER BY id";

/// Helper function to construct a Photo from a database row.
fn build_photo_from_row(row: &rusqlite::Row) -> rusqlite::Result<Photo> {
    let kind_str: String = row.get(4)?;
    let kind = kind_str.parse::<PhotoKind>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("Invalid photo kind: {kind_str}").into(),
        )
    })?;

    Ok(Photo {
        id: row.get::<_, i64>(0)? as u64,
        task_id: row.get::<_, i64>(1)? as u64,
        intervention_id: row.get::<_, Option<i64>>(2)?.map(|v| v as u64),
        step_id: row.get::<_, Option<i64>>(3)?.map(|v| v as u64),
        kind,
        path: row.get(5)?,
        caption: row.get(6)?,
        created_at: row
            .get::<_, String>(7)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?,
    })
}

impl super::Database {
    /// Registers a photo against a task, optionally associated with an
    /// intervention and/or a step.
    pub fn attach_photo(
        &mut self,
        task_id: u64,
        intervention_id: Option<u64>,
        step_id: Option<u64>,
        kind: PhotoKind,
        path: &str,
        caption: Option<&str>,
    ) -> Result<Photo> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        task_queries::task_by_id(&tx, task_id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id: task_id })?;

        if let Some(id) = intervention_id {
            intervention_queries::intervention_by_id(&tx, id)
                .map_err(|e| WorkshopError::database_error("Failed to query intervention", e))?
                .ok_or(WorkshopError::InterventionNotFound { id })?;
        }

        if let Some(id) = step_id {
            step_queries::step_by_id(&tx, id)
                .map_err(|e| WorkshopError::database_error("Failed to query step", e))?
                .ok_or(WorkshopError::StepNotFound { id })?;
        }

        let now = Timestamp::now();

        tx.execute(
            INSERT_PHOTO_SQL,
            params![
                task_id as i64,
                intervention_id.map(|v| v as i64),
                step_id.map(|v| v as i64),
                kind.as_str(),
                path,
                caption,
                now.to_string()
            ],
        )
        .map_err(|e| WorkshopError::database_error("Failed to insert photo", e))?;

        let id = tx.last_insert_rowid() as u64;

        let photo = tx
            .query_row(SELECT_PHOTO_SQL, params![id as i64], build_photo_from_row)
            .optional()
            .map_err(|e| WorkshopError::database_error("Failed to query photo", e))?
            .ok_or(WorkshopError::Configuration {
                message: format!("Photo {id} missing right after insert"),
            })?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(photo)
    }

    /// Lists all photos registered against a task, oldest first.
    pub fn list_photos(&self, task_id: u64) -> Result<Vec<Photo>> {
        task_queries::task_by_id(&self.connection, task_id)
            .map_err(|e| WorkshopError::database_error("Failed to query task", e))?
            .ok_or(WorkshopError::TaskNotFound { id: task_id })?;

        let mut stmt = self
            .connection
            .prepare(SELECT_PHOTOS_BY_TASK_SQL)
            .map_err(|e| WorkshopError::database_error("Failed to prepare query", e))?;

        let photos = stmt
            .query_map(params![task_id as i64], build_photo_from_row)
            .map_err(|e| WorkshopError::database_error("Failed to query photos", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| WorkshopError::database_error("Failed to fetch photos", e))?;

        Ok(photos)
    }
}

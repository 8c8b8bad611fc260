//! Builder for creating and configuring Workshop instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Workshop;
use crate::{
    db::Database,
    error::{Result, WorkshopError},
    models::{Actor, Role},
};

/// Builder for creating and configuring Workshop instances.
#[derive(Debug, Clone)]
pub struct WorkshopBuilder {
    database_path: Option<PathBuf>,
    role: Role,
}

impl WorkshopBuilder {
    /// Creates a new builder with default settings (technician role).
    pub fn new() -> Self {
        Self {
            database_path: None,
            role: Role::default(),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/lamina/lamina.db` or `~/.local/share/lamina/lamina.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the caller's role. Authentication happens elsewhere; the role
    /// arrives here as request context.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Builds the configured workshop instance.
    ///
    /// # Errors
    ///
    /// Returns `WorkshopError::FileSystem` if the database path is invalid
    /// Returns `WorkshopError::Database` if database initialization fails
    pub async fn build(self) -> Result<Workshop> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkshopError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), WorkshopError>(())
        })
        .await
        .map_err(|e| WorkshopError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Workshop::new(db_path, Actor::new(self.role)))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("lamina")
            .place_data_file("lamina.db")
            .map_err(|e| WorkshopError::XdgDirectory(e.to_string()))
    }
}

impl Default for WorkshopBuilder {
    fn default() -> Self {
        Self::new()
    }
}

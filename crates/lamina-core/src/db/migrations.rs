//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result, WorkshopError};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Check if caption column exists in photos table
        let has_caption_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('photos') WHERE name = 'caption'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        // Add caption column if it doesn't exist
        if !has_caption_column {
            self.connection
                .execute("ALTER TABLE photos ADD COLUMN caption TEXT", [])
                .map_err(|e| {
                    WorkshopError::database_error("Failed to add caption column to photos table", e)
                })?;
        }

        // Check if skip_reason column exists in steps table
        let has_skip_reason_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('steps') WHERE name = 'skip_reason'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        // Add skip_reason column if it doesn't exist
        if !has_skip_reason_column {
            self.connection
                .execute("ALTER TABLE steps ADD COLUMN skip_reason TEXT", [])
                .map_err(|e| {
                    WorkshopError::database_error(
                        "Failed to add skip_reason column to steps table",
                        e,
                    )
                })?;
        }

        Ok(())
    }
}

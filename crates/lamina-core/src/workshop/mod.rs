//! High-level workshop API for managing tasks, interventions, steps and
//! photos.
//!
//! This module provides the main [`Workshop`] interface for interacting with
//! the Lamina system. The workshop acts as the central coordinator between
//! the interface layers (CLI, MCP) and the database, enforcing the role
//! model and running each operation on the blocking thread pool.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Interfaces    │    │   Operations    │    │    Database     │
//! │   (CLI, MCP)    │───▶│ (task_ops,      │───▶│   (via db/)     │
//! │                 │    │  step_ops, ...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Workshop`] instances with
//!   configuration (database path, caller role)
//! - [`task_ops`]: Task operations (create, list, show, assign, cancel,
//!   archive, purge, sync)
//! - [`intervention_ops`]: Intervention lifecycle (start, show active,
//!   pause, resume)
//! - [`step_ops`]: Step operations (show, list, draft save, advance, skip)
//! - [`photo_ops`]: Photo registry (attach, list)
//!
//! Every operation checks the caller's [`Actor`] role before touching the
//! database; the db layer itself carries no permission logic.
//!
//! # Usage Examples
//!
//! ```rust
//! use lamina_core::{WorkshopBuilder, models::Role, params::CreateTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workshop = WorkshopBuilder::new()
//!     .with_database_path(Some("/custom/path/lamina.db"))
//!     .with_role(Role::Technician)
//!     .build()
//!     .await?;
//!
//! let task = workshop
//!     .create_task(&CreateTask {
//!         vehicle_make: "Porsche".to_string(),
//!         vehicle_model: "911".to_string(),
//!         vehicle_plate: "AB-123-CD".to_string(),
//!         customer_name: "Jordan Miller".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::models::Actor;

// Module declarations
pub mod builder;
pub mod intervention_ops;
pub mod photo_ops;
pub mod step_ops;
pub mod task_ops;

#[cfg(test)]
mod tests;

// Re-export the main types
pub use builder::WorkshopBuilder;

/// Main workshop interface for managing tasks and their workflows.
pub struct Workshop {
    pub(crate) db_path: PathBuf,
    pub(crate) actor: Actor,
}

impl Workshop {
    /// Creates a new workshop with the specified database path and caller.
    pub(crate) fn new(db_path: PathBuf, actor: Actor) -> Self {
        Self { db_path, actor }
    }

    /// The role context this workshop instance operates under.
    pub fn actor(&self) -> Actor {
        self.actor
    }
}

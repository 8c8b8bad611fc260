//! Core library for the Lamina paint-protection-film workshop manager.
//!
//! This crate provides the core business logic for managing workshop tasks,
//! film installation interventions, and their guided steps, including
//! database operations, data models, and error handling.
//!
//! # Display Architecture
//!
//! The crate implements a Display-based architecture for formatting output:
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for direct
//!   formatting
//! - **Display Wrappers** ([`display`]): Provide contextual and specialized
//!   formatting
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! This separation allows the same data to be formatted differently depending
//! on context (lists vs. individual items, creation results vs. updates, etc.)
//! while maintaining consistency across all output.
//!
//! # Quick Start
//!
//! ```rust
//! use lamina_core::{WorkshopBuilder, params::CreateTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a workshop instance
//! let workshop = WorkshopBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! // Register a vehicle for film installation
//! let create_params = CreateTask {
//!     vehicle_make: "Porsche".to_string(),
//!     vehicle_model: "911".to_string(),
//!     vehicle_plate: "AB-123-CD".to_string(),
//!     customer_name: "Jordan Miller".to_string(),
//!     ..Default::default()
//! };
//!
//! let task = workshop.create_task(&create_params).await?;
//! println!("Created task: {}", task);
//!
//! // List tasks as summaries
//! use lamina_core::params::ListTasks;
//! let tasks = workshop.list_tasks(&ListTasks::default()).await?;
//! for task in &tasks {
//!     println!("Vehicle: {} {}", task.vehicle_make, task.vehicle_model);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod workflow;
pub mod workshop;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, LocalDateTime, OperationStatus, Photos, Steps, TaskSummaries,
    UpdateResult,
};
pub use error::{Result, WorkshopError};
pub use models::{
    Actor, AdvanceOutcome, Intervention, InterventionStatus, Photo, PhotoKind, Role, Step,
    StepKind, StepStatus, SyncReport, Task, TaskFilter, TaskStatus, TaskSummary,
};
pub use params::{
    AssignTechnician, AttachPhoto, CreateTask, Id, ListTasks, PurgeTasks, SaveStepDraft, SkipStep,
    StartIntervention,
};
pub use workshop::{Workshop, WorkshopBuilder};

//! Data models for tasks, interventions, steps and photos.
//!
//! This module contains the core domain models of the Lamina workshop
//! system. Display implementations for these models are located in
//! [`crate::display::models`] to maintain clean separation of concerns
//! between data structures and presentation logic.
//!
//! Ownership follows the workflow: a [`Task`] owns its [`Intervention`]s
//! (typically one active), an intervention owns its ordered [`Step`]s, and
//! steps reference [`Photo`]s by association rather than containment.

pub mod actor;
pub mod filters;
pub mod intervention;
pub mod photo;
pub mod status;
pub mod step;
pub mod summary;
pub mod task;


// Re-export all public types at the models level
pub use actor::{Actor, Role};
pub use filters::TaskFilter;
pub use intervention::Intervention;
pub use photo::Photo;
pub use status::{InterventionStatus, PhotoKind, StepKind, StepStatus, TaskStatus};
pub use step::{AdvanceOutcome, Step};
pub use summary::{SyncReport, TaskSummary};
pub use task::Task;

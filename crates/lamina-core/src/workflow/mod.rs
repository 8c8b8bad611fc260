//! Pure workflow logic: completion rules, draft merges and progress
//! projection.
//!
//! Everything in this module is side-effect free. The database layer calls
//! into it inside its transactions; the same functions back the testable
//! properties of the step-advance and sync paths.

pub mod merge;
pub mod progress;
pub mod rules;

pub use merge::{merge_collected_data, union_photo_urls};
pub use progress::{
    completion_percentage, derive_intervention_status, project_task_status, settled_count,
    steps_percentage,
};
pub use rules::{evaluate, rule_for, StepRule, MIN_PHOTOS_CONDITION};

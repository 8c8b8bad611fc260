//! Completion percentage and status projection.
//!
//! These are the deterministic projections behind task–workflow sync:
//! given the same step states they always produce the same percentage,
//! intervention status and task status.

use crate::models::{InterventionStatus, Step, StepKind, StepStatus, TaskStatus};

/// round(100 × settled / total); 0 when there are no steps.
pub fn completion_percentage(settled: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((f64::from(settled) * 100.0) / f64::from(total)).round() as u8
}

/// Count of settled (completed or skipped) steps.
pub fn settled_count(steps: &[Step]) -> u32 {
    steps.iter().filter(|s| s.status.is_settled()).count() as u32
}

/// Completion percentage over a slice of steps.
pub fn steps_percentage(steps: &[Step]) -> u8 {
    completion_percentage(settled_count(steps), steps.len() as u32)
}

/// Derive the intervention status from its steps.
///
/// All steps settled → completed; only the finalization step unsettled →
/// finalizing; otherwise in_progress. A paused intervention stays paused
/// until explicitly resumed, so callers must not apply this to one.
pub fn derive_intervention_status(steps: &[Step]) -> InterventionStatus {
    if !steps.is_empty() && steps.iter().all(|s| s.status.is_settled()) {
        return InterventionStatus::Completed;
    }

    let only_finalization_remains = steps
        .iter()
        .filter(|s| !s.status.is_settled())
        .all(|s| s.kind == StepKind::Finalization);
    if only_finalization_remains {
        InterventionStatus::Finalizing
    } else {
        InterventionStatus::InProgress
    }
}

/// Project the task status from its steps.
///
/// All steps settled → completed; any step in_progress → in_progress;
/// otherwise the current status is left unchanged.
pub fn project_task_status(current: TaskStatus, steps: &[Step]) -> TaskStatus {
    if !steps.is_empty() && steps.iter().all(|s| s.status.is_settled()) {
        TaskStatus::Completed
    } else if steps.iter().any(|s| s.status == StepStatus::InProgress) {
        TaskStatus::InProgress
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use serde_json::Map;

    use super::*;

    fn step(number: u32, kind: StepKind, status: StepStatus) -> Step {
        Step {
            id: u64::from(number) + 1,
            intervention_id: 1,
            step_number: number,
            kind,
            status,
            collected_data: Map::new(),
            photo_urls: vec![],
            skip_reason: None,
            completed_at: None,
            created_at: Timestamp::from_second(1735689600).unwrap(),
            updated_at: Timestamp::from_second(1735689600).unwrap(),
        }
    }

    fn four_steps(statuses: [StepStatus; 4]) -> Vec<Step> {
        StepKind::TEMPLATE
            .iter()
            .zip(statuses)
            .enumerate()
            .map(|(i, (kind, status))| step(i as u32, *kind, status))
            .collect()
    }

    #[test]
    fn test_percentage_half_done() {
        let steps = four_steps([
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::InProgress,
            StepStatus::Pending,
        ]);
        assert_eq!(steps_percentage(&steps), 50);
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
    }

    #[test]
    fn test_percentage_hundred_iff_all_settled() {
        let all_settled = four_steps([
            StepStatus::Completed,
            StepStatus::Skipped,
            StepStatus::Completed,
            StepStatus::Completed,
        ]);
        assert_eq!(steps_percentage(&all_settled), 100);

        let one_failed = four_steps([
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Failed,
        ]);
        assert!(steps_percentage(&one_failed) < 100);
    }

    #[test]
    fn test_percentage_empty_is_zero() {
        assert_eq!(steps_percentage(&[]), 0);
    }

    #[test]
    fn test_intervention_finalizing_when_only_finalization_remains() {
        let steps = four_steps([
            StepStatus::Completed,
            StepStatus::Skipped,
            StepStatus::Completed,
            StepStatus::InProgress,
        ]);
        assert_eq!(
            derive_intervention_status(&steps),
            InterventionStatus::Finalizing
        );
    }

    #[test]
    fn test_intervention_completed_when_all_settled() {
        let steps = four_steps([
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Completed,
        ]);
        assert_eq!(
            derive_intervention_status(&steps),
            InterventionStatus::Completed
        );
    }

    #[test]
    fn test_intervention_in_progress_otherwise() {
        let steps = four_steps([
            StepStatus::Completed,
            StepStatus::InProgress,
            StepStatus::Pending,
            StepStatus::Pending,
        ]);
        assert_eq!(
            derive_intervention_status(&steps),
            InterventionStatus::InProgress
        );
    }

    #[test]
    fn test_task_projection() {
        let half = four_steps([
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::InProgress,
            StepStatus::Pending,
        ]);
        assert_eq!(
            project_task_status(TaskStatus::Assigned, &half),
            TaskStatus::InProgress
        );

        let done = four_steps([
            StepStatus::Completed,
            StepStatus::Skipped,
            StepStatus::Completed,
            StepStatus::Completed,
        ]);
        assert_eq!(
            project_task_status(TaskStatus::InProgress, &done),
            TaskStatus::Completed
        );

        // Nothing active, nothing settled: leave the status alone.
        let idle = four_steps([
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
        ]);
        assert_eq!(
            project_task_status(TaskStatus::Assigned, &idle),
            TaskStatus::Assigned
        );
    }

    #[test]
    fn test_task_projection_no_steps_unchanged() {
        assert_eq!(
            project_task_status(TaskStatus::Pending, &[]),
            TaskStatus::Pending
        );
    }
}

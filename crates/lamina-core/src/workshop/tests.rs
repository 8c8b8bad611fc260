//! Tests for the workshop module.

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use super::*;
use crate::{
    error::WorkshopError,
    models::{
        AdvanceOutcome, InterventionStatus, Role, Step, StepStatus, TaskStatus,
    },
    params::{
        AssignTechnician, AttachPhoto, CreateTask, Id, ListTasks, PurgeTasks, SaveStepDraft,
        SkipStep, StartIntervention,
    },
    workflow,
};

/// Helper function to create a test workshop with the given role
async fn create_test_workshop(role: Role) -> (TempDir, Workshop) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let workshop = WorkshopBuilder::new()
        .with_database_path(Some(&db_path))
        .with_role(role)
        .build()
        .await
        .expect("Failed to create workshop");
    (temp_dir, workshop)
}

fn sample_task() -> CreateTask {
    CreateTask {
        vehicle_make: "Porsche".to_string(),
        vehicle_model: "911".to_string(),
        vehicle_plate: "AB-123-CD".to_string(),
        customer_name: "Jordan Miller".to_string(),
        customer_phone: Some("+33 6 12 34 56 78".to_string()),
        scheduled_at: None,
        technician: None,
    }
}

fn checklist_draft(keys: &[&str]) -> Map<String, Value> {
    let mut checklist = Map::new();
    for key in keys {
        checklist.insert((*key).to_string(), Value::Bool(true));
    }
    let mut data = Map::new();
    data.insert("checklist".to_string(), Value::Object(checklist));
    data
}

/// Satisfy a step's completion rule (checklist + photo minimum) and
/// advance it.
async fn satisfy_and_advance(workshop: &Workshop, step: &Step) -> AdvanceOutcome {
    let rule = workflow::rule_for(step.kind);
    let photos: Vec<String> = (0..rule.min_photos)
        .map(|i| format!("photos/step{}-{i}.jpg", step.id))
        .collect();

    workshop
        .save_step_draft(&SaveStepDraft {
            step_id: step.id,
            data: checklist_draft(rule.required_checklist),
            photo_urls: photos,
        })
        .await
        .expect("Failed to save draft");

    workshop
        .advance_step(&Id { id: step.id })
        .await
        .expect("Failed to advance step")
}

#[tokio::test]
async fn test_create_task_starts_pending() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop
        .create_task(&sample_task())
        .await
        .expect("Failed to create task");

    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.vehicle_plate, "AB-123-CD");

    let fetched = workshop
        .get_task(&Id { id: task.id })
        .await
        .expect("Failed to get task")
        .expect("Task should exist");
    assert_eq!(fetched.customer_name, "Jordan Miller");
    assert!(fetched.interventions.is_empty());
}

#[tokio::test]
async fn test_create_task_with_technician_is_assigned() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop
        .create_task(&CreateTask {
            technician: Some("Sam".to_string()),
            ..sample_task()
        })
        .await
        .expect("Failed to create task");

    assert_eq!(task.status, TaskStatus::Assigned);
    assert_eq!(task.technician, Some("Sam".to_string()));
}

#[tokio::test]
async fn test_assign_technician_moves_pending_to_assigned() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let updated = workshop
        .assign_technician(&AssignTechnician {
            task_id: task.id,
            technician: "Sam".to_string(),
        })
        .await
        .expect("Failed to assign technician");

    assert_eq!(updated.status, TaskStatus::Assigned);
    assert_eq!(updated.technician, Some("Sam".to_string()));
}

#[tokio::test]
async fn test_list_tasks_filters() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Admin).await;

    let first = workshop.create_task(&sample_task()).await.unwrap();
    workshop
        .create_task(&CreateTask {
            vehicle_plate: "EF-456-GH".to_string(),
            technician: Some("Sam".to_string()),
            ..sample_task()
        })
        .await
        .unwrap();

    let all = workshop.list_tasks(&ListTasks::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let by_plate = workshop
        .list_tasks(&ListTasks {
            plate: Some("456".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_plate.len(), 1);
    assert_eq!(by_plate[0].vehicle_plate, "EF-456-GH");

    let by_technician = workshop
        .list_tasks(&ListTasks {
            technician: Some("Sam".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_technician.len(), 1);

    // Archived tasks leave the normal view and appear in the archived one
    workshop.archive_task(&Id { id: first.id }).await.unwrap();

    let active = workshop.list_tasks(&ListTasks::default()).await.unwrap();
    assert_eq!(active.len(), 1);

    let archived = workshop
        .list_tasks(&ListTasks {
            archived: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, first.id);
}

#[tokio::test]
async fn test_start_intervention_instantiates_template() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            weather: Some("dry".to_string()),
            location: Some("bay 2".to_string()),
            zones: vec!["hood".to_string(), "front bumper".to_string()],
        })
        .await
        .expect("Failed to start intervention");

    assert_eq!(intervention.status, InterventionStatus::InProgress);
    assert!(intervention.started_at.is_some());
    assert_eq!(intervention.steps.len(), 4);
    assert_eq!(intervention.steps[0].status, StepStatus::InProgress);
    for step in &intervention.steps[1..] {
        assert_eq!(step.status, StepStatus::Pending);
    }
    assert_eq!(
        intervention
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    // The task follows the workflow into in_progress
    let task = workshop
        .get_task(&Id { id: task.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);

    // A second unfinished intervention is rejected
    let second = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await;
    assert!(matches!(
        second,
        Err(WorkshopError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_draft_saves_merge_deep_and_idempotent() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();
    let step_id = intervention.steps[0].id;

    workshop
        .save_step_draft(&SaveStepDraft {
            step_id,
            data: json!({"checklist": {"a": true}})
                .as_object()
                .cloned()
                .unwrap(),
            photo_urls: vec!["p1.jpg".to_string()],
        })
        .await
        .unwrap();

    let second = SaveStepDraft {
        step_id,
        data: json!({"checklist": {"b": true}, "notes": "ok"})
            .as_object()
            .cloned()
            .unwrap(),
        photo_urls: vec!["p1.jpg".to_string(), "p2.jpg".to_string()],
    };
    let step = workshop.save_step_draft(&second).await.unwrap();

    // Nested objects merge deep, new keys join old ones
    assert_eq!(
        Value::Object(step.collected_data.clone()),
        json!({"checklist": {"a": true, "b": true}, "notes": "ok"})
    );
    // Photo URLs union in first-seen order
    assert_eq!(step.photo_urls, vec!["p1.jpg", "p2.jpg"]);

    // Idempotent under an identical repeated save
    let again = workshop.save_step_draft(&second).await.unwrap();
    assert_eq!(again.collected_data, step.collected_data);
    assert_eq!(again.photo_urls, step.photo_urls);
}

#[tokio::test]
async fn test_advance_reports_exact_unmet_conditions() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();
    let step_id = intervention.steps[0].id;

    // Partially satisfied: one checklist key true, one photo of two
    workshop
        .save_step_draft(&SaveStepDraft {
            step_id,
            data: json!({"checklist": {"exterior_inspected": true}})
                .as_object()
                .cloned()
                .unwrap(),
            photo_urls: vec!["p1.jpg".to_string()],
        })
        .await
        .unwrap();

    let err = workshop
        .advance_step(&Id { id: step_id })
        .await
        .expect_err("Advance should fail validation");

    match err {
        WorkshopError::ValidationFailed { conditions } => {
            assert_eq!(
                conditions,
                vec![
                    "checklist.damage_recorded".to_string(),
                    "min_photos".to_string()
                ]
            );
        }
        other => panic!("Expected ValidationFailed, got {other:?}"),
    }

    // Nothing was persisted by the failed advance
    let step = workshop
        .get_step(&Id { id: step_id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(step.status, StepStatus::InProgress);
    assert!(step.completed_at.is_none());
}

#[tokio::test]
async fn test_advance_passes_and_activates_next() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    let outcome = satisfy_and_advance(&workshop, &intervention.steps[0]).await;

    assert_eq!(outcome.step.status, StepStatus::Completed);
    assert!(outcome.step.completed_at.is_some());
    assert!(!outcome.workflow_complete);

    let next = outcome.next_step.expect("A next step should activate");
    assert_eq!(next.step_number, 2);
    assert_eq!(next.status, StepStatus::InProgress);
}

#[tokio::test]
async fn test_sync_half_done_intervention() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    // Settle the first two steps; the third activates, the fourth stays
    // pending: [completed, completed, in_progress, pending]
    satisfy_and_advance(&workshop, &intervention.steps[0]).await;
    satisfy_and_advance(&workshop, &intervention.steps[1]).await;

    let report = workshop.sync_task(&Id { id: task.id }).await.unwrap();
    assert_eq!(report.completion_percentage, 50);
    assert_eq!(report.task.status, TaskStatus::InProgress);

    // Sync is a pure projection: repeating it changes nothing
    let repeat = workshop.sync_task(&Id { id: task.id }).await.unwrap();
    assert_eq!(repeat.completion_percentage, 50);
    assert_eq!(repeat.task.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn test_skip_step_counts_as_settled() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    satisfy_and_advance(&workshop, &intervention.steps[0]).await;

    // Skip preparation without any photos or checklist data
    let outcome = workshop
        .skip_step(&SkipStep {
            step_id: intervention.steps[1].id,
            reason: "Surface prepared by the customer's detailer".to_string(),
        })
        .await
        .expect("Failed to skip step");

    assert_eq!(outcome.step.status, StepStatus::Skipped);
    assert_eq!(
        outcome.step.skip_reason.as_deref(),
        Some("Surface prepared by the customer's detailer")
    );
    let next = outcome.next_step.expect("Installation should activate");
    assert_eq!(next.step_number, 3);

    // The remaining steps can still complete the intervention
    satisfy_and_advance(&workshop, &intervention.steps[2]).await;
    let last = satisfy_and_advance(&workshop, &intervention.steps[3]).await;
    assert!(last.workflow_complete);
    assert!(last.next_step.is_none());

    let finished = workshop
        .get_intervention(&Id { id: intervention.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, InterventionStatus::Completed);
    assert!(finished.completed_at.is_some());

    // Settled means completed or skipped: the sync reaches 100%
    let report = workshop.sync_task(&Id { id: task.id }).await.unwrap();
    assert_eq!(report.completion_percentage, 100);
    assert_eq!(report.task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_finalizing_status_before_last_step() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    satisfy_and_advance(&workshop, &intervention.steps[0]).await;
    satisfy_and_advance(&workshop, &intervention.steps[1]).await;
    let outcome = satisfy_and_advance(&workshop, &intervention.steps[2]).await;
    assert!(!outcome.workflow_complete);

    let current = workshop
        .get_intervention(&Id { id: intervention.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, InterventionStatus::Finalizing);
}

#[tokio::test]
async fn test_pause_blocks_step_writes_until_resume() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();
    let step = &intervention.steps[0];

    let rule = workflow::rule_for(step.kind);
    workshop
        .save_step_draft(&SaveStepDraft {
            step_id: step.id,
            data: checklist_draft(rule.required_checklist),
            photo_urls: (0..rule.min_photos).map(|i| format!("p{i}.jpg")).collect(),
        })
        .await
        .unwrap();

    let paused = workshop
        .pause_intervention(&Id { id: intervention.id })
        .await
        .unwrap();
    assert_eq!(paused.status, InterventionStatus::Paused);

    // A satisfied draft still cannot advance while paused
    let blocked = workshop.advance_step(&Id { id: step.id }).await;
    assert!(matches!(blocked, Err(WorkshopError::InvalidInput { .. })));

    let resumed = workshop
        .resume_intervention(&Id { id: intervention.id })
        .await
        .unwrap();
    assert_eq!(resumed.status, InterventionStatus::InProgress);

    workshop
        .advance_step(&Id { id: step.id })
        .await
        .expect("Advance should pass after resume");

    // Resuming an intervention that is not paused is rejected
    let double_resume = workshop
        .resume_intervention(&Id { id: intervention.id })
        .await;
    assert!(matches!(
        double_resume,
        Err(WorkshopError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_settled_steps_reject_drafts() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    let outcome = satisfy_and_advance(&workshop, &intervention.steps[0]).await;

    let rejected = workshop
        .save_step_draft(&SaveStepDraft {
            step_id: outcome.step.id,
            data: json!({"late": true}).as_object().cloned().unwrap(),
            photo_urls: vec![],
        })
        .await;
    assert!(matches!(
        rejected,
        Err(WorkshopError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_viewer_is_read_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let technician = WorkshopBuilder::new()
        .with_database_path(Some(&db_path))
        .with_role(Role::Technician)
        .build()
        .await
        .unwrap();
    let task = technician.create_task(&sample_task()).await.unwrap();

    let viewer = WorkshopBuilder::new()
        .with_database_path(Some(&db_path))
        .with_role(Role::Viewer)
        .build()
        .await
        .unwrap();

    // Reads are allowed
    assert!(viewer.get_task(&Id { id: task.id }).await.unwrap().is_some());
    assert_eq!(
        viewer.list_tasks(&ListTasks::default()).await.unwrap().len(),
        1
    );

    // Writes are denied with the role and action
    let denied = viewer.create_task(&sample_task()).await;
    match denied {
        Err(WorkshopError::PermissionDenied { role, .. }) => assert_eq!(role, "viewer"),
        other => panic!("Expected PermissionDenied, got {other:?}"),
    }
    assert!(matches!(
        viewer
            .start_intervention(&StartIntervention {
                task_id: task.id,
                ..Default::default()
            })
            .await,
        Err(WorkshopError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn test_purge_is_admin_only_and_needs_confirmation() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Admin).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    workshop.archive_task(&Id { id: task.id }).await.unwrap();

    // Unconfirmed purge is rejected
    let unconfirmed = workshop
        .purge_archived_tasks(&PurgeTasks { confirmed: false })
        .await;
    assert!(matches!(
        unconfirmed,
        Err(WorkshopError::InvalidInput { .. })
    ));

    let purged = workshop
        .purge_archived_tasks(&PurgeTasks { confirmed: true })
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert!(workshop
        .get_task(&Id { id: task.id })
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_technician_cannot_purge() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let denied = workshop
        .purge_archived_tasks(&PurgeTasks { confirmed: true })
        .await;
    assert!(matches!(
        denied,
        Err(WorkshopError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn test_unarchive_restores_by_technician_presence() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Admin).await;

    let unassigned = workshop.create_task(&sample_task()).await.unwrap();
    workshop.archive_task(&Id { id: unassigned.id }).await.unwrap();
    let restored = workshop
        .unarchive_task(&Id { id: unassigned.id })
        .await
        .unwrap();
    assert_eq!(restored.status, TaskStatus::Pending);

    let assigned = workshop
        .create_task(&CreateTask {
            technician: Some("Sam".to_string()),
            ..sample_task()
        })
        .await
        .unwrap();
    workshop.archive_task(&Id { id: assigned.id }).await.unwrap();
    let restored = workshop
        .unarchive_task(&Id { id: assigned.id })
        .await
        .unwrap();
    assert_eq!(restored.status, TaskStatus::Assigned);
}

#[tokio::test]
async fn test_cancel_task_rules() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Admin).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let cancelled = workshop.cancel_task(&Id { id: task.id }).await.unwrap();
    assert_eq!(cancelled.status, TaskStatus::Cancelled);

    // Cancelling twice is rejected
    let twice = workshop.cancel_task(&Id { id: task.id }).await;
    assert!(matches!(twice, Err(WorkshopError::InvalidInput { .. })));

    // Cancelled tasks cannot start interventions
    let start = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await;
    assert!(matches!(start, Err(WorkshopError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_photo_registry() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .unwrap();

    let photo = workshop
        .attach_photo(&AttachPhoto {
            task_id: task.id,
            intervention_id: Some(intervention.id),
            step_id: Some(intervention.steps[0].id),
            kind: "before".to_string(),
            path: "photos/hood.jpg".to_string(),
            caption: Some("Stone chips".to_string()),
        })
        .await
        .expect("Failed to attach photo");
    assert_eq!(photo.task_id, task.id);

    let photos = workshop.list_photos(&Id { id: task.id }).await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos.iter().next().unwrap().path, "photos/hood.jpg");

    // Unknown associations are rejected
    let bad = workshop
        .attach_photo(&AttachPhoto {
            task_id: 9999,
            kind: "after".to_string(),
            path: "photos/x.jpg".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(bad, Err(WorkshopError::TaskNotFound { id: 9999 })));
}

#[tokio::test]
async fn test_show_active_intervention_and_steps() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop.create_task(&sample_task()).await.unwrap();

    // No intervention yet
    let none = workshop
        .show_active_intervention(&Id { id: task.id })
        .await
        .unwrap();
    assert!(none.is_none());

    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            zones: vec!["hood".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    let active = workshop
        .show_active_intervention(&Id { id: task.id })
        .await
        .unwrap()
        .expect("Intervention should be active");
    assert_eq!(active.id, intervention.id);
    assert_eq!(active.zones, vec!["hood"]);

    let steps = workshop.list_steps(&Id { id: task.id }).await.unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0].status, StepStatus::InProgress);
}

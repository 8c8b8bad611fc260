mod common;

use common::create_test_workshop;
use lamina_core::{
    models::Role,
    params::{
        AssignTechnician, AttachPhoto, CreateTask, Id, ListTasks, PurgeTasks, SaveStepDraft,
        SkipStep, StartIntervention,
    },
    InterventionStatus, StepStatus, TaskStatus, WorkshopError,
};
use serde_json::json;

fn draft(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().expect("draft must be an object").clone()
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_workshop_workflow() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Admin).await;

    // Register the vehicle
    let task = workshop
        .create_task(&CreateTask {
            vehicle_make: "Tesla".to_string(),
            vehicle_model: "Model 3".to_string(),
            vehicle_plate: "EF-456-GH".to_string(),
            customer_name: "Alex Chen".to_string(),
            customer_phone: Some("+33 7 98 76 54 32".to_string()),
            scheduled_at: Some("2026-09-01T09:00:00Z".to_string()),
            technician: None,
        })
        .await
        .expect("Failed to create task");
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.scheduled_at.is_some());

    // Hand it to a technician
    let task = workshop
        .assign_technician(&AssignTechnician {
            task_id: task.id,
            technician: "Sam".to_string(),
        })
        .await
        .expect("Failed to assign technician");
    assert_eq!(task.status, TaskStatus::Assigned);

    // Start the film installation
    let intervention = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            weather: Some("overcast".to_string()),
            location: Some("bay 1".to_string()),
            zones: vec!["hood".to_string(), "mirrors".to_string()],
        })
        .await
        .expect("Failed to start intervention");
    assert_eq!(intervention.steps.len(), 4);

    // Inspection: collect evidence, then advance
    let inspection = &intervention.steps[0];
    workshop
        .save_step_draft(&SaveStepDraft {
            step_id: inspection.id,
            data: draft(json!({
                "checklist": {"exterior_inspected": true, "damage_recorded": true},
                "notes": "light swirl marks on the hood"
            })),
            photo_urls: vec!["insp-1.jpg".to_string(), "insp-2.jpg".to_string()],
        })
        .await
        .expect("Failed to save inspection draft");
    let outcome = workshop
        .advance_step(&Id { id: inspection.id })
        .await
        .expect("Failed to advance inspection");
    assert_eq!(outcome.step.status, StepStatus::Completed);

    // Preparation was already handled elsewhere, skip it
    let preparation = outcome.next_step.expect("Preparation should activate");
    let outcome = workshop
        .skip_step(&SkipStep {
            step_id: preparation.id,
            reason: "Panel arrived pre-cleaned from the body shop".to_string(),
        })
        .await
        .expect("Failed to skip preparation");
    assert_eq!(outcome.step.status, StepStatus::Skipped);

    // Halfway through, the sync reports 50% and an in_progress task
    let report = workshop
        .sync_task(&Id { id: task.id })
        .await
        .expect("Failed to sync task");
    assert_eq!(report.completion_percentage, 50);
    assert_eq!(report.task.status, TaskStatus::InProgress);

    // Installation
    let installation = outcome.next_step.expect("Installation should activate");
    workshop
        .save_step_draft(&SaveStepDraft {
            step_id: installation.id,
            data: draft(json!({
                "checklist": {"film_applied": true, "edges_sealed": true}
            })),
            photo_urls: vec!["inst-1.jpg".to_string(), "inst-2.jpg".to_string()],
        })
        .await
        .expect("Failed to save installation draft");
    let outcome = workshop
        .advance_step(&Id { id: installation.id })
        .await
        .expect("Failed to advance installation");

    // With only finalization left the intervention is finalizing
    let active = workshop
        .show_active_intervention(&Id { id: task.id })
        .await
        .expect("Failed to show intervention")
        .expect("Intervention should exist");
    assert_eq!(active.status, InterventionStatus::Finalizing);

    // Finalization needs three photos
    let finalization = outcome.next_step.expect("Finalization should activate");
    workshop
        .save_step_draft(&SaveStepDraft {
            step_id: finalization.id,
            data: draft(json!({
                "checklist": {"final_inspection_passed": true, "customer_notified": true}
            })),
            photo_urls: vec![
                "final-1.jpg".to_string(),
                "final-2.jpg".to_string(),
                "final-3.jpg".to_string(),
            ],
        })
        .await
        .expect("Failed to save finalization draft");
    let outcome = workshop
        .advance_step(&Id { id: finalization.id })
        .await
        .expect("Failed to advance finalization");
    assert!(outcome.workflow_complete);
    assert!(outcome.next_step.is_none());

    // Keep delivery photos on the registry
    workshop
        .attach_photo(&AttachPhoto {
            task_id: task.id,
            intervention_id: Some(intervention.id),
            step_id: Some(finalization.id),
            kind: "after".to_string(),
            path: "photos/delivery.jpg".to_string(),
            caption: Some("Handover".to_string()),
        })
        .await
        .expect("Failed to attach photo");
    let photos = workshop
        .list_photos(&Id { id: task.id })
        .await
        .expect("Failed to list photos");
    assert_eq!(photos.len(), 1);

    // Completion flows back to the task
    let report = workshop
        .sync_task(&Id { id: task.id })
        .await
        .expect("Failed to sync task");
    assert_eq!(report.completion_percentage, 100);
    assert_eq!(report.task.status, TaskStatus::Completed);

    // Archive and purge the finished job
    workshop
        .archive_task(&Id { id: task.id })
        .await
        .expect("Failed to archive task");
    let purged = workshop
        .purge_archived_tasks(&PurgeTasks { confirmed: true })
        .await
        .expect("Failed to purge");
    assert_eq!(purged, 1);
    assert!(workshop
        .get_task(&Id { id: task.id })
        .await
        .expect("query failed")
        .is_none());
}

#[tokio::test]
async fn test_list_tasks_by_status() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let pending = workshop
        .create_task(&CreateTask {
            vehicle_make: "Audi".to_string(),
            vehicle_model: "RS6".to_string(),
            vehicle_plate: "IJ-789-KL".to_string(),
            customer_name: "Robin Faure".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create task");
    workshop
        .create_task(&CreateTask {
            vehicle_make: "BMW".to_string(),
            vehicle_model: "M4".to_string(),
            vehicle_plate: "MN-012-OP".to_string(),
            customer_name: "Dana Ruiz".to_string(),
            technician: Some("Sam".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create task");

    let only_pending = workshop
        .list_tasks(&ListTasks {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        })
        .await
        .expect("Failed to list tasks");
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].id, pending.id);

    let only_assigned = workshop
        .list_tasks(&ListTasks {
            status: Some(TaskStatus::Assigned),
            ..Default::default()
        })
        .await
        .expect("Failed to list tasks");
    assert_eq!(only_assigned.len(), 1);
    assert_eq!(only_assigned[0].technician, Some("Sam".to_string()));
}

#[tokio::test]
async fn test_second_intervention_after_completion() {
    let (_temp_dir, workshop) = create_test_workshop(Role::Technician).await;

    let task = workshop
        .create_task(&CreateTask {
            vehicle_make: "Porsche".to_string(),
            vehicle_model: "Cayenne".to_string(),
            vehicle_plate: "QR-345-ST".to_string(),
            customer_name: "Morgan Yun".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create task");

    let first = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            ..Default::default()
        })
        .await
        .expect("Failed to start intervention");
    for step in &first.steps {
        workshop
            .skip_step(&SkipStep {
                step_id: step.id,
                reason: "Dry run before the scheduled appointment".to_string(),
            })
            .await
            .expect("Failed to skip step");
    }

    // A completed intervention no longer blocks a new one
    let second = workshop
        .start_intervention(&StartIntervention {
            task_id: task.id,
            zones: vec!["full front".to_string()],
            ..Default::default()
        })
        .await
        .expect("Failed to start second intervention");
    assert_ne!(second.id, first.id);

    // The latest intervention is what the task shows as active
    let active = workshop
        .show_active_intervention(&Id { id: task.id })
        .await
        .expect("Failed to show intervention")
        .expect("Intervention should exist");
    assert_eq!(active.id, second.id);

    // An invalid draft on an unknown step surfaces a not-found error
    let missing = workshop
        .save_step_draft(&SaveStepDraft {
            step_id: 9999,
            data: serde_json::Map::new(),
            photo_urls: vec![],
        })
        .await;
    assert!(matches!(
        missing,
        Err(WorkshopError::StepNotFound { id: 9999 })
    ));
}

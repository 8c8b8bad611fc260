use lamina_core::{
    Database, InterventionStatus, PhotoKind, StepStatus, TaskStatus, WorkshopError,
};
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn create_sample_task(db: &mut Database, technician: Option<&str>) -> lamina_core::Task {
    db.create_task(
        "Porsche",
        "911",
        "AB-123-CD",
        "Jordan Miller",
        Some("+33 6 12 34 56 78"),
        None,
        technician,
    )
    .expect("Failed to create task")
}

fn draft(value: Value) -> Map<String, Value> {
    value.as_object().expect("draft must be an object").clone()
}

#[test]
fn test_database_initialization() {
    let (_temp_file, _db) = create_test_db();

    assert!(_temp_file.path().exists());
}

#[test]
fn test_schema_is_reentrant() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

    {
        let mut db = Database::new(temp_file.path()).expect("First open failed");
        create_sample_task(&mut db, None);
    }

    // Reopening runs the schema and migrations again without data loss
    let db = Database::new(temp_file.path()).expect("Second open failed");
    let tasks = db.list_tasks(None).expect("Failed to list tasks");
    assert_eq!(tasks.len(), 1);
}

#[test]
fn test_create_task() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);

    assert!(task.id > 0);
    assert_eq!(task.vehicle_make, "Porsche");
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.interventions.is_empty());
}

#[test]
fn test_get_task_missing_returns_none() {
    let (_temp_file, db) = create_test_db();

    let task = db.get_task(42).expect("Failed to query task");
    assert!(task.is_none());
}

#[test]
fn test_get_task_eager_loads_interventions() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    db.start_intervention(task.id, Some("dry"), None, &["hood".to_string()])
        .expect("Failed to start intervention");

    let fetched = db
        .get_task(task.id)
        .expect("Failed to get task")
        .expect("Task should exist");
    assert_eq!(fetched.interventions.len(), 1);
    assert_eq!(fetched.interventions[0].steps.len(), 4);
    assert_eq!(fetched.interventions[0].zones, vec!["hood"]);
}

#[test]
fn test_assign_technician_keeps_later_statuses() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    db.start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");

    // Reassignment on an in_progress task changes the name, not the status
    let updated = db
        .assign_technician(task.id, "Sam")
        .expect("Failed to assign technician");
    assert_eq!(updated.technician, Some("Sam".to_string()));
    assert_eq!(updated.status, TaskStatus::InProgress);
}

#[test]
fn test_unfinished_intervention_blocks_new_one() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    db.start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");

    let second = db.start_intervention(task.id, None, None, &[]);
    assert!(matches!(second, Err(WorkshopError::InvalidInput { .. })));
}

#[test]
fn test_completed_intervention_allows_another() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");

    for step in &intervention.steps {
        db.skip_step(step.id, "Warranty rework, original record applies")
            .expect("Failed to skip step");
    }

    let finished = db
        .get_intervention(intervention.id)
        .expect("Failed to get intervention")
        .expect("Intervention should exist");
    assert_eq!(finished.status, InterventionStatus::Completed);

    let next = db
        .start_intervention(task.id, None, None, &[])
        .expect("A completed intervention should not block a new one");
    assert_ne!(next.id, intervention.id);
}

#[test]
fn test_save_step_draft_merges() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");
    let step_id = intervention.steps[0].id;

    db.save_step_draft(
        step_id,
        &draft(json!({"checklist": {"exterior_inspected": true}})),
        &["a.jpg".to_string()],
    )
    .expect("Failed to save first draft");

    let step = db
        .save_step_draft(
            step_id,
            &draft(json!({"checklist": {"damage_recorded": true}})),
            &["b.jpg".to_string(), "a.jpg".to_string()],
        )
        .expect("Failed to save second draft");

    assert_eq!(
        Value::Object(step.collected_data),
        json!({"checklist": {"exterior_inspected": true, "damage_recorded": true}})
    );
    assert_eq!(step.photo_urls, vec!["a.jpg", "b.jpg"]);
}

#[test]
fn test_save_step_draft_keeps_unrelated_fields() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");
    let step_id = intervention.steps[0].id;

    db.save_step_draft(step_id, &draft(json!({"checklist": {"a": true}})), &[])
        .expect("Failed to save first draft");

    // A later partial save merges into the nested checklist instead of
    // replacing it, and sibling scalar fields ride along untouched.
    let step = db
        .save_step_draft(
            step_id,
            &draft(json!({"checklist": {"b": true}, "notes": "ok"})),
            &[],
        )
        .expect("Failed to save second draft");

    assert_eq!(
        Value::Object(step.collected_data),
        json!({"checklist": {"a": true, "b": true}, "notes": "ok"})
    );
}

#[test]
fn test_advance_step_requires_active_step() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");

    // Only the in_progress step may advance; a pending one is rejected
    let pending_id = intervention.steps[1].id;
    let result = db.advance_step(pending_id);
    assert!(matches!(result, Err(WorkshopError::InvalidInput { .. })));
}

#[test]
fn test_failed_validation_leaves_step_untouched() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");
    let step_id = intervention.steps[0].id;

    let result = db.advance_step(step_id);
    assert!(matches!(
        result,
        Err(WorkshopError::ValidationFailed { .. })
    ));

    let step = db
        .get_step(step_id)
        .expect("Failed to get step")
        .expect("Step should exist");
    assert_eq!(step.status, StepStatus::InProgress);
}

#[test]
fn test_skip_step_requires_reason() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);
    let intervention = db
        .start_intervention(task.id, None, None, &[])
        .expect("Failed to start intervention");

    let outcome = db
        .skip_step(intervention.steps[0].id, "Customer declined inspection")
        .expect("Failed to skip step");
    assert_eq!(outcome.step.status, StepStatus::Skipped);
    assert!(outcome.step.completed_at.is_none());
    assert_eq!(
        outcome.next_step.map(|s| s.step_number),
        Some(2),
        "The following step should activate"
    );
}

#[test]
fn test_attach_photo_validates_associations() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, None);

    let bad_intervention = db.attach_photo(
        task.id,
        Some(999),
        None,
        PhotoKind::Before,
        "photos/x.jpg",
        None,
    );
    assert!(matches!(
        bad_intervention,
        Err(WorkshopError::InterventionNotFound { id: 999 })
    ));

    let photo = db
        .attach_photo(task.id, None, None, PhotoKind::Before, "photos/x.jpg", None)
        .expect("Failed to attach photo");
    assert_eq!(photo.task_id, task.id);
    assert_eq!(photo.kind, PhotoKind::Before);

    let photos = db.list_photos(task.id).expect("Failed to list photos");
    assert_eq!(photos.len(), 1);
}

#[test]
fn test_purge_only_removes_archived() {
    let (_temp_file, mut db) = create_test_db();

    let keep = create_sample_task(&mut db, None);
    let stale = create_sample_task(&mut db, None);
    db.start_intervention(stale.id, None, None, &[])
        .expect("Failed to start intervention");
    db.attach_photo(stale.id, None, None, PhotoKind::Before, "p.jpg", None)
        .expect("Failed to attach photo");
    db.archive_task(stale.id).expect("Failed to archive task");

    let purged = db.purge_archived_tasks().expect("Failed to purge");
    assert_eq!(purged, 1);

    assert!(db.get_task(stale.id).expect("query failed").is_none());
    assert!(db.get_task(keep.id).expect("query failed").is_some());
}

#[test]
fn test_sync_task_without_intervention() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_sample_task(&mut db, Some("Sam"));

    let report = db.sync_task(task.id).expect("Failed to sync task");
    assert_eq!(report.completion_percentage, 0);
    assert!(report.intervention.is_none());
    assert_eq!(report.task.status, TaskStatus::Assigned);
}

use lamina_core::{models::Role, Workshop, WorkshopBuilder};
use tempfile::TempDir;

/// Helper function to create a test workshop
pub async fn create_test_workshop(role: Role) -> (TempDir, Workshop) {
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

//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{Photo, Step, TaskSummary};

/// Newtype wrapper for displaying collections of task summaries.
///
/// This provides clean Display formatting for task collections without title
/// handling, allowing consumers to handle titles separately. Handles empty
/// collections gracefully.
pub struct TaskSummaries(pub Vec<TaskSummary>);

impl TaskSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of task summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the task summary at the given index.
    pub fn get(&self, index: usize) -> Option<&TaskSummary> {
        self.0.get(index)
    }

    /// Get an iterator over the task summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskSummary> {
        self.0.iter()
    }
}

impl Index<usize> for TaskSummaries {
    type Output = TaskSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for TaskSummaries {
    type Item = TaskSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskSummaries {
    type Item = &'a TaskSummary;
    type IntoIter = std::slice::Iter<'a, TaskSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TaskSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tasks found.")
        } else {
            for task in &self.0 {
                write!(f, "{}", task)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of steps.
///
/// Handles empty collections gracefully and formats each step using the
/// existing Step Display trait.
pub struct Steps(pub Vec<Step>);

impl Steps {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of steps in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the step at the given index.
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.0.get(index)
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Steps {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{}", step)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of photos.
pub struct Photos(pub Vec<Photo>);

impl Photos {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of photos in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the photos.
    pub fn iter(&self) -> std::slice::Iter<'_, Photo> {
        self.0.iter()
    }
}

impl IntoIterator for Photos {
    type Item = Photo;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Photos {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Photos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No photos found.")
        } else {
            for photo in &self.0 {
                write!(f, "{}", photo)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{PhotoKind, StepKind, StepStatus, TaskStatus};

    fn create_test_task_summary() -> TaskSummary {
        TaskSummary {
            id: 1,
            vehicle_make: "Porsche".to_string(),
            vehicle_model: "911".to_string(),
            vehicle_plate: "AB-123-CD".to_string(),
            customer_name: "Jordan Miller".to_string(),
            status: TaskStatus::InProgress,
            technician: Some("Sam".to_string()),
            scheduled_at: None,
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            updated_at: Timestamp::from_second(1640995200).unwrap(),
            total_steps: 4,
            settled_steps: 2,
        }
    }

    fn create_test_step() -> Step {
        Step {
            id: 1,
            intervention_id: 1,
            step_number: 1,
            kind: StepKind::Inspection,
            status: StepStatus::InProgress,
            collected_data: serde_json::Map::new(),
            photo_urls: vec!["photos/front.jpg".to_string()],
            skip_reason: None,
            completed_at: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_task_summaries_display() {
        // Test with tasks
        let tasks = vec![create_test_task_summary()];
        let summaries = TaskSummaries(tasks);
        let output = format!("{}", summaries);
        assert!(output.contains("Porsche 911 (AB-123-CD)"));
        assert!(output.contains("ID: 1"));
        assert!(output.contains("(2/4, 50%)"));

        // Test empty collection
        let empty_summaries = TaskSummaries(vec![]);
        let empty_output = format!("{}", empty_summaries);
        assert_eq!(empty_output, "No tasks found.\n");

        // Test multiple tasks
        let task1 = create_test_task_summary();
        let mut task2 = create_test_task_summary();
        task2.id = 2;
        task2.vehicle_plate = "EF-456-GH".to_string();
        let summaries = TaskSummaries(vec![task1, task2]);
        let output = format!("{}", summaries);
        assert!(output.contains("AB-123-CD"));
        assert!(output.contains("EF-456-GH"));
        assert!(output.contains("ID: 1"));
        assert!(output.contains("ID: 2"));
        // Verify it doesn't start with a title header
        assert!(!output.starts_with("# "));
    }

    #[test]
    fn test_steps_display_empty() {
        let steps = Steps(vec![]);
        let output = format!("{}", steps);
        assert_eq!(output, "No steps found.\n");
    }

    #[test]
    fn test_steps_display_single_step() {
        let step = create_test_step();
        let steps = Steps(vec![step]);
        let output = format!("{}", steps);

        assert!(output.contains("### 1. Inspection (➤ In Progress)"));
        assert!(output.contains("photos/front.jpg"));
    }

    #[test]
    fn test_steps_display_multiple_steps() {
        let step1 = create_test_step();
        let mut step2 = create_test_step();
        step2.id = 2;
        step2.step_number = 2;
        step2.kind = StepKind::Preparation;
        step2.status = StepStatus::Completed;
        step2.photo_urls.clear();

        let steps = Steps(vec![step1, step2]);
        let output = format!("{}", steps);

        assert!(output.contains("### 1. Inspection (➤ In Progress)"));
        assert!(output.contains("### 2. Preparation (✓ Completed)"));
    }

    #[test]
    fn test_photos_display() {
        let photo = Photo {
            id: 7,
            task_id: 1,
            intervention_id: Some(1),
            step_id: None,
            kind: PhotoKind::Before,
            path: "photos/hood.jpg".to_string(),
            caption: Some("Stone chips on the hood".to_string()),
            created_at: Timestamp::from_second(1640995200).unwrap(),
        };
        let photos = Photos(vec![photo]);
        let output = format!("{}", photos);

        assert!(output.contains("[before] photos/hood.jpg (ID: 7)"));
        assert!(output.contains("Stone chips on the hood"));

        let empty = Photos(vec![]);
        assert_eq!(format!("{}", empty), "No photos found.\n");
    }
}

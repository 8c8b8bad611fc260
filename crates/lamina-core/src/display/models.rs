//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation
//! of concerns.
//!
//! The Display implementations provide:
//! - Markdown-formatted output for rich terminal display
//! - Consistent formatting with status icons and structured sections
//! - Context-aware display behavior for different use cases

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Intervention, InterventionStatus, Photo, PhotoKind, Step, StepKind, StepStatus, Task,
    TaskStatus, TaskSummary,
};

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StepKind {
    /// Capitalized phase name used in step headers.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Inspection => "Inspection",
            StepKind::Preparation => "Preparation",
            StepKind::Installation => "Installation",
            StepKind::Finalization => "Finalization",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.vehicle_label())?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Customer: {}", self.customer_name)?;
        if let Some(phone) = &self.customer_phone {
            writeln!(f, "- Phone: {phone}")?;
        }
        if let Some(technician) = &self.technician {
            writeln!(f, "- Technician: {technician}")?;
        }
        if let Some(scheduled) = &self.scheduled_at {
            writeln!(f, "- Scheduled: {}", LocalDateTime(scheduled))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.interventions.is_empty() {
            writeln!(f, "\n## Interventions")?;
            writeln!(f)?;
            for intervention in &self.interventions {
                write!(f, "{}", intervention)?;
            }
        } else {
            writeln!(f, "\nNo interventions on this task.")?;
        }

        Ok(())
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Intervention {} ({})", self.id, self.status.as_str())?;
        writeln!(f)?;

        if let Some(weather) = &self.weather {
            writeln!(f, "- Weather: {weather}")?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "- Location: {location}")?;
        }
        if !self.zones.is_empty() {
            writeln!(f, "- Zones: {}", self.zones.join(", "))?;
        }
        if let Some(started) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started))?;
        }
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }

        if !self.steps.is_empty() {
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{}", step)?;
            }
        } else {
            writeln!(f, "\nNo steps in this intervention.")?;
        }

        Ok(())
    }
}

impl Step {
    /// Format the step using the clean, compact display format.
    ///
    /// This uses the same format whether the step is displayed standalone
    /// or within an intervention context.
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.step_number,
            self.kind.label(),
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if !self.collected_data.is_empty() {
            writeln!(f, "#### Collected data")?;
            writeln!(f)?;
            writeln!(f, "```json")?;
            let rendered = serde_json::to_string_pretty(&self.collected_data)
                .map_err(|_| fmt::Error)?;
            writeln!(f, "{rendered}")?;
            writeln!(f, "```")?;
            writeln!(f)?;
        }

        if !self.photo_urls.is_empty() {
            writeln!(f, "#### Photos")?;
            writeln!(f)?;
            for url in &self.photo_urls {
                writeln!(f, "- {url}")?;
            }
            writeln!(f)?;
        }

        // Show the reason only for skipped steps
        if self.status == StepStatus::Skipped {
            if let Some(reason) = &self.skip_reason {
                writeln!(f, "#### Skip reason")?;
                writeln!(f)?;
                writeln!(f, "{reason}")?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f)
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- [{}] {} (ID: {})",
            self.kind.as_str(),
            self.path,
            self.id
        )?;
        if let Some(caption) = &self.caption {
            write!(f, " ({caption})")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_steps > 0 {
            format!(
                " ({}/{}, {}%)",
                self.settled_steps,
                self.total_steps,
                self.completion_percentage()
            )
        } else {
            String::new()
        };

        writeln!(
            f,
            "## {} {} ({}) (ID: {}){progress}",
            self.vehicle_make, self.vehicle_model, self.vehicle_plate, self.id
        )?;
        writeln!(f)?;

        writeln!(f, "- **Status**: {}", self.status.as_str())?;
        writeln!(f, "- **Customer**: {}", self.customer_name)?;

        if let Some(technician) = &self.technician {
            writeln!(f, "- **Technician**: {technician}")?;
        }

        if let Some(scheduled) = &self.scheduled_at {
            writeln!(f, "- **Scheduled**: {}", LocalDateTime(scheduled))?;
        }

        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?; // Add blank line after each task

        Ok(())
    }
}

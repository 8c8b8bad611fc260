//! Command-line interface definitions using clap
//!
//! This module defines the complete CLI structure using clap's derive API,
//! implementing the parameter wrapper pattern for clean separation between
//! CLI framework concerns and core domain logic.
//!
//! ## Parameter Wrapper Pattern Implementation
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Business Logic
//! ```
//!
//! Each command defines a CLI-specific argument structure with clap derives
//! and a `From` conversion into the matching core parameter type. CLI
//! concerns (help text, aliases, value delimiters) stay in this layer while
//! the core types remain interface-agnostic.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use lamina_core::{
    display::{CreateResult, OperationStatus, UpdateResult},
    models::TaskStatus,
    params::*,
    Workshop,
};
use serde_json::{Map, Value};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Task commands
// ============================================================================

/// Register a new workshop task
#[derive(Args)]
pub struct CreateTaskArgs {
    /// Vehicle manufacturer
    pub vehicle_make: String,
    /// Vehicle model
    pub vehicle_model: String,
    /// License plate
    pub vehicle_plate: String,
    /// Customer name
    pub customer_name: String,
    /// Customer phone number
    #[arg(short = 'p', long, help = "Customer phone number")]
    pub phone: Option<String>,
    /// Scheduled appointment as an RFC 3339 timestamp
    #[arg(
        short,
        long,
        help = "Scheduled appointment as an RFC 3339 timestamp, e.g. 2026-09-01T09:00:00Z"
    )]
    pub scheduled_at: Option<String>,
    /// Technician to assign immediately
    #[arg(short, long, help = "Technician to assign immediately")]
    pub technician: Option<String>,
}

impl From<CreateTaskArgs> for CreateTask {
    fn from(val: CreateTaskArgs) -> Self {
        CreateTask {
            vehicle_make: val.vehicle_make,
            vehicle_model: val.vehicle_model,
            vehicle_plate: val.vehicle_plate,
            customer_name: val.customer_name,
            customer_phone: val.phone,
            scheduled_at: val.scheduled_at,
            technician: val.technician,
        }
    }
}

/// List workshop tasks
///
/// Display either active tasks (default) or archived tasks based on the
/// --archived flag. Additional filters narrow the list by status, assigned
/// technician, or a license plate fragment.
#[derive(Args)]
pub struct ListTasksArgs {
    /// Show archived tasks instead of active ones
    #[arg(long, help = "Show archived tasks instead of active ones")]
    pub archived: bool,
    /// Filter by task status
    #[arg(long, value_enum, help = "Filter by task status")]
    pub status: Option<TaskStatusArg>,
    /// Filter by assigned technician (exact match)
    #[arg(long, help = "Filter by assigned technician (exact match)")]
    pub technician: Option<String>,
    /// Filter by a license plate fragment
    #[arg(long, help = "Filter by a license plate fragment")]
    pub plate: Option<String>,
}

impl From<ListTasksArgs> for ListTasks {
    fn from(val: ListTasksArgs) -> Self {
        ListTasks {
            archived: val.archived,
            status: val.status.map(Into::into),
            technician: val.technician,
            plate: val.plate,
        }
    }
}

/// Show details of a specific task
#[derive(Args)]
pub struct ShowTaskArgs {
    /// ID of the task to display
    #[arg(help = "Unique identifier of the task to show details for")]
    pub id: u64,
}

impl From<ShowTaskArgs> for Id {
    fn from(val: ShowTaskArgs) -> Self {
        Id { id: val.id }
    }
}

/// Assign a technician to a task
#[derive(Args)]
pub struct AssignTechnicianArgs {
    /// ID of the task to assign
    #[arg(help = "Unique identifier of the task to assign")]
    pub task_id: u64,
    /// Name of the technician
    pub technician: String,
}

impl From<AssignTechnicianArgs> for AssignTechnician {
    fn from(val: AssignTechnicianArgs) -> Self {
        AssignTechnician {
            task_id: val.task_id,
            technician: val.technician,
        }
    }
}

/// Purge all archived tasks permanently
#[derive(Args)]
pub struct PurgeTasksArgs {
    /// Confirm the purge (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<PurgeTasksArgs> for PurgeTasks {
    fn from(val: PurgeTasksArgs) -> Self {
        PurgeTasks {
            confirmed: val.confirm,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Register a new workshop task
    #[command(alias = "c")]
    Create(CreateTaskArgs),
    /// List workshop tasks
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Show details of a specific task
    #[command(alias = "s")]
    Show(ShowTaskArgs),
    /// Assign a technician to a task
    #[command(alias = "as")]
    Assign(AssignTechnicianArgs),
    /// Cancel a task
    Cancel(ShowTaskArgs),
    /// Archive a task
    #[command(alias = "a")]
    Archive(ShowTaskArgs),
    /// Restore an archived task
    #[command(alias = "u")]
    Unarchive(ShowTaskArgs),
    /// Permanently delete all archived tasks
    Purge(PurgeTasksArgs),
    /// Recompute a task's status and completion from its workflow
    Sync(ShowTaskArgs),
}

// ============================================================================
// Intervention commands
// ============================================================================

/// Start a film installation intervention on a task
///
/// Instantiates the fixed four-step workflow (inspection, preparation,
/// installation, finalization) with the first step active. A task can only
/// carry one unfinished intervention at a time.
#[derive(Args)]
pub struct StartInterventionArgs {
    /// ID of the task to start the intervention on
    #[arg(help = "Unique identifier of the task to start the intervention on")]
    pub task_id: u64,
    /// Weather conditions during the installation
    #[arg(short, long, help = "Weather conditions during the installation")]
    pub weather: Option<String>,
    /// Workshop location or bay
    #[arg(short, long, help = "Workshop location or bay")]
    pub location: Option<String>,
    /// Vehicle zones receiving film - comma-separated list
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Vehicle zones receiving film as comma-separated list"
    )]
    pub zones: Vec<String>,
}

impl From<StartInterventionArgs> for StartIntervention {
    fn from(val: StartInterventionArgs) -> Self {
        StartIntervention {
            task_id: val.task_id,
            weather: val.weather,
            location: val.location,
            zones: val.zones,
        }
    }
}

/// Show details of a specific intervention
#[derive(Args)]
pub struct ShowInterventionArgs {
    /// ID of the intervention to display
    #[arg(help = "Unique identifier of the intervention to show details for")]
    pub id: u64,
}

impl From<ShowInterventionArgs> for Id {
    fn from(val: ShowInterventionArgs) -> Self {
        Id { id: val.id }
    }
}

/// Show the latest intervention on a task
#[derive(Args)]
pub struct ActiveInterventionArgs {
    /// ID of the task to inspect
    #[arg(help = "Unique identifier of the task whose latest intervention to show")]
    pub task_id: u64,
}

impl From<ActiveInterventionArgs> for Id {
    fn from(val: ActiveInterventionArgs) -> Self {
        Id { id: val.task_id }
    }
}

#[derive(Subcommand)]
pub enum InterventionCommands {
    /// Start a film installation on a task
    #[command(alias = "st")]
    Start(StartInterventionArgs),
    /// Show details of a specific intervention
    #[command(alias = "s")]
    Show(ShowInterventionArgs),
    /// Show the latest intervention on a task
    #[command(alias = "a")]
    Active(ActiveInterventionArgs),
    /// Pause an in-progress intervention
    Pause(ShowInterventionArgs),
    /// Resume a paused intervention
    Resume(ShowInterventionArgs),
}

// ============================================================================
// Step commands
// ============================================================================

/// Show details of a specific step
#[derive(Args)]
pub struct ShowStepArgs {
    /// ID of the step to display
    #[arg(help = "Unique identifier of the step to show details for")]
    pub id: u64,
}

impl From<ShowStepArgs> for Id {
    fn from(val: ShowStepArgs) -> Self {
        Id { id: val.id }
    }
}

/// List the workflow steps of a task's latest intervention
#[derive(Args)]
pub struct ListStepsArgs {
    /// ID of the task whose steps to list
    #[arg(help = "Unique identifier of the task whose workflow steps to list")]
    pub task_id: u64,
}

impl From<ListStepsArgs> for Id {
    fn from(val: ListStepsArgs) -> Self {
        Id { id: val.task_id }
    }
}

/// Save a draft of collected evidence on a step
///
/// Draft data merges into what was previously saved (nested objects merge
/// key by key) and photo URLs accumulate as a set, so repeated saves with
/// the same content are harmless.
#[derive(Args)]
pub struct SaveStepDraftArgs {
    /// ID of the step to update
    #[arg(help = "Unique identifier of the step to save the draft on")]
    pub step_id: u64,
    /// Collected data as a JSON object
    #[arg(
        short,
        long,
        help = "Collected data as a JSON object, e.g. '{\"checklist\": {\"surface_cleaned\": true}}'"
    )]
    pub data: Option<String>,
    /// Photo URLs - comma-separated list
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Photo URLs as comma-separated list"
    )]
    pub photos: Vec<String>,
}

impl SaveStepDraftArgs {
    /// Convert to core parameters, parsing the JSON data payload.
    pub fn into_params(self) -> Result<SaveStepDraft> {
        let data: Map<String, Value> = match self.data {
            None => Map::new(),
            Some(raw) => serde_json::from_str(&raw)
                .context("--data must be a valid JSON object")?,
        };
        Ok(SaveStepDraft {
            step_id: self.step_id,
            data,
            photo_urls: self.photos,
        })
    }
}

/// Skip a step with a mandatory reason
#[derive(Args)]
pub struct SkipStepArgs {
    /// ID of the step to skip
    #[arg(help = "Unique identifier of the step to skip")]
    pub step_id: u64,
    /// Reason the step does not apply
    pub reason: String,
}

impl From<SkipStepArgs> for SkipStep {
    fn from(val: SkipStepArgs) -> Self {
        SkipStep {
            step_id: val.step_id,
            reason: val.reason,
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Show details of a specific step
    #[command(alias = "s")]
    Show(ShowStepArgs),
    /// List the steps of a task's latest intervention
    #[command(aliases = ["l", "ls"])]
    List(ListStepsArgs),
    /// Save a draft of collected evidence on a step
    #[command(alias = "d")]
    Draft(SaveStepDraftArgs),
    /// Validate the active step and move to the next one
    #[command(alias = "a")]
    Advance(ShowStepArgs),
    /// Skip a step with a reason
    Skip(SkipStepArgs),
}

// ============================================================================
// Photo commands
// ============================================================================

/// Register a photo on a task
#[derive(Args)]
pub struct AttachPhotoArgs {
    /// ID of the owning task
    #[arg(help = "Unique identifier of the task the photo belongs to")]
    pub task_id: u64,
    /// Storage path or URL of the photo
    pub path: String,
    /// Kind of photo
    #[arg(short, long, value_enum, default_value_t = PhotoKindArg::Before)]
    pub kind: PhotoKindArg,
    /// Intervention to associate the photo with
    #[arg(short, long, help = "Intervention to associate the photo with")]
    pub intervention: Option<u64>,
    /// Step to associate the photo with
    #[arg(short, long, help = "Step to associate the photo with")]
    pub step: Option<u64>,
    /// Free-form caption
    #[arg(short, long, help = "Free-form caption")]
    pub caption: Option<String>,
}

impl From<AttachPhotoArgs> for AttachPhoto {
    fn from(val: AttachPhotoArgs) -> Self {
        AttachPhoto {
            task_id: val.task_id,
            intervention_id: val.intervention,
            step_id: val.step,
            kind: val.kind.to_string(),
            path: val.path,
            caption: val.caption,
        }
    }
}

/// List the photos registered on a task
#[derive(Args)]
pub struct ListPhotosArgs {
    /// ID of the task whose photos to list
    #[arg(help = "Unique identifier of the task whose photos to list")]
    pub task_id: u64,
}

impl From<ListPhotosArgs> for Id {
    fn from(val: ListPhotosArgs) -> Self {
        Id { id: val.task_id }
    }
}

#[derive(Subcommand)]
pub enum PhotoCommands {
    /// Register a photo on a task
    #[command(alias = "a")]
    Add(AttachPhotoArgs),
    /// List the photos registered on a task
    #[command(aliases = ["l", "ls"])]
    List(ListPhotosArgs),
}

// ============================================================================
// Value enums
// ============================================================================

/// Command-line argument representation of task status values
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum TaskStatusArg {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Archived,
}

impl From<TaskStatusArg> for TaskStatus {
    fn from(val: TaskStatusArg) -> Self {
        match val {
            TaskStatusArg::Pending => TaskStatus::Pending,
            TaskStatusArg::Assigned => TaskStatus::Assigned,
            TaskStatusArg::InProgress => TaskStatus::InProgress,
            TaskStatusArg::Completed => TaskStatus::Completed,
            TaskStatusArg::Cancelled => TaskStatus::Cancelled,
            TaskStatusArg::Archived => TaskStatus::Archived,
        }
    }
}

/// Command-line argument representation of photo kinds
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum PhotoKindArg {
    /// Condition before the installation
    Before,
    /// Work in progress
    During,
    /// Finished result
    After,
}

impl std::fmt::Display for PhotoKindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoKindArg::Before => write!(f, "before"),
            PhotoKindArg::During => write!(f, "during"),
            PhotoKindArg::After => write!(f, "after"),
        }
    }
}

// ============================================================================
// Command runtime
// ============================================================================

/// CLI command runtime bundling the workshop handle and terminal renderer.
pub struct Cli {
    workshop: Workshop,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(workshop: Workshop, renderer: TerminalRenderer) -> Self {
        Self { workshop, renderer }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Create(args) => {
                let task = self.workshop.create_task(&args.into()).await?;
                self.renderer.render(&CreateResult::new(task).to_string())
            }
            TaskCommands::List(args) => self.list_tasks(args.into()).await,
            TaskCommands::Show(args) => {
                let params = args.into();
                match self.workshop.get_task(&params).await? {
                    Some(task) => self.renderer.render(&task.to_string()),
                    None => self.render_missing("Task", params.id),
                }
            }
            TaskCommands::Assign(args) => {
                let params: AssignTechnician = args.into();
                let technician = params.technician.clone();
                let task = self.workshop.assign_technician(&params).await?;
                let result = UpdateResult::with_changes(
                    task,
                    vec![format!("Assigned technician '{technician}'")],
                );
                self.renderer.render(&result.to_string())
            }
            TaskCommands::Cancel(args) => {
                let task = self.workshop.cancel_task(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Cancelled task '{}' (ID: {}).",
                        task.vehicle_label(),
                        task.id
                    ))
                    .to_string(),
                )
            }
            TaskCommands::Archive(args) => {
                let task = self.workshop.archive_task(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Archived task with ID {}. Use 'task unarchive' to restore it.",
                        task.id
                    ))
                    .to_string(),
                )
            }
            TaskCommands::Unarchive(args) => {
                let task = self.workshop.unarchive_task(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Unarchived task with ID {}. Task is now {}.",
                        task.id, task.status
                    ))
                    .to_string(),
                )
            }
            TaskCommands::Purge(args) => {
                let purged = self.workshop.purge_archived_tasks(&args.into()).await?;
                self.renderer.render(
                    &OperationStatus::success(format!(
                        "Purged {purged} archived task(s). This action cannot be undone."
                    ))
                    .to_string(),
                )
            }
            TaskCommands::Sync(args) => {
                let report = self.workshop.sync_task(&args.into()).await?;
                self.renderer.render(&report.to_string())
            }
        }
    }

    pub async fn handle_intervention_command(&self, command: InterventionCommands) -> Result<()> {
        match command {
            InterventionCommands::Start(args) => {
                let intervention = self.workshop.start_intervention(&args.into()).await?;
                self.renderer
                    .render(&CreateResult::new(intervention).to_string())
            }
            InterventionCommands::Show(args) => {
                let params = args.into();
                match self.workshop.get_intervention(&params).await? {
                    Some(intervention) => self.renderer.render(&intervention.to_string()),
                    None => self.render_missing("Intervention", params.id),
                }
            }
            InterventionCommands::Active(args) => {
                let params = args.into();
                match self.workshop.show_active_intervention(&params).await? {
                    Some(intervention) => self.renderer.render(&intervention.to_string()),
                    None => self.renderer.render(
                        &OperationStatus::failure(format!(
                            "Task {} has no interventions yet.",
                            params.id
                        ))
                        .to_string(),
                    ),
                }
            }
            InterventionCommands::Pause(args) => {
                let intervention = self.workshop.pause_intervention(&args.into()).await?;
                let result =
                    UpdateResult::with_changes(intervention, vec!["Paused".to_string()]);
                self.renderer.render(&result.to_string())
            }
            InterventionCommands::Resume(args) => {
                let intervention = self.workshop.resume_intervention(&args.into()).await?;
                let result =
                    UpdateResult::with_changes(intervention, vec!["Resumed".to_string()]);
                self.renderer.render(&result.to_string())
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Show(args) => {
                let params = args.into();
                match self.workshop.get_step(&params).await? {
                    Some(step) => self.renderer.render(&step.to_string()),
                    None => self.render_missing("Step", params.id),
                }
            }
            StepCommands::List(args) => {
                let steps = self.workshop.list_steps(&args.into()).await?;
                self.renderer.render(&steps.to_string())
            }
            StepCommands::Draft(args) => {
                let step = self.workshop.save_step_draft(&args.into_params()?).await?;
                let result =
                    UpdateResult::with_changes(step, vec!["Saved draft".to_string()]);
                self.renderer.render(&result.to_string())
            }
            StepCommands::Advance(args) => {
                let outcome = self.workshop.advance_step(&args.into()).await?;
                self.renderer.render(&outcome.to_string())
            }
            StepCommands::Skip(args) => {
                let outcome = self.workshop.skip_step(&args.into()).await?;
                self.renderer.render(&outcome.to_string())
            }
        }
    }

    pub async fn handle_photo_command(&self, command: PhotoCommands) -> Result<()> {
        match command {
            PhotoCommands::Add(args) => {
                let photo = self.workshop.attach_photo(&args.into()).await?;
                self.renderer.render(&CreateResult::new(photo).to_string())
            }
            PhotoCommands::List(args) => {
                let photos = self.workshop.list_photos(&args.into()).await?;
                self.renderer.render(&photos.to_string())
            }
        }
    }

    pub async fn list_tasks(&self, params: ListTasks) -> Result<()> {
        let summaries = self.workshop.list_tasks(&params).await?;

        if summaries.is_empty() {
            return self.renderer.render(&summaries.to_string());
        }

        let title = if params.archived {
            "Archived Tasks"
        } else {
            "Active Tasks"
        };
        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }

    fn render_missing(&self, entity: &str, id: u64) -> Result<()> {
        self.renderer
            .render(&OperationStatus::failure(format!("{entity} with ID {id} not found.")).to_string())
    }
}

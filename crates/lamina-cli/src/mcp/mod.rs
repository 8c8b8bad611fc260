//! MCP server implementation for Lamina
//!
//! This module implements the Model Context Protocol server for Lamina,
//! providing a standardized interface for AI models to interact with
//! the workshop management system.

use std::sync::Arc;

use anyhow::Result;
use lamina_core::Workshop;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;
pub mod prompts;

// Re-export parameter types and result type from handlers for external use
pub use handlers::{
    AssignTechnician, AttachPhoto, CreateTask, Id, ListTasks, McpResult, PurgeTasks,
    SaveStepDraft, SkipStep, StartIntervention,
};

/// MCP server for Lamina
#[derive(Clone)]
pub struct LaminaMcpServer {
    workshop: Arc<Mutex<Workshop>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LaminaMcpServer {
    /// Create a new Lamina MCP server
    pub fn new(workshop: Workshop) -> Self {
        Self {
            workshop: Arc::new(Mutex::new(workshop)),
            tool_router: Self::tool_router(),
        }
    }

    // Tool methods that delegate to handlers::McpHandlers methods
    #[tool(
        name = "create_task",
        description = "Register a vehicle for paint protection film work. Provide vehicle_make, vehicle_model, vehicle_plate and customer_name (all required), plus optional customer_phone, scheduled_at (RFC 3339) and technician. Returns the new task ID."
    )]
    async fn create_task(&self, params: Parameters<CreateTask>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.create_task(params).await
    }

    #[tool(
        name = "list_tasks",
        description = "List workshop tasks. Use archived=false (default) for active tasks or archived=true for archived ones. Optional filters: status (pending, assigned, in_progress, completed, cancelled, archived), technician (exact match), plate (substring). Returns a formatted list with IDs, vehicles and progress."
    )]
    async fn list_tasks(&self, params: Parameters<ListTasks>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.list_tasks(params).await
    }

    #[tool(
        name = "show_task",
        description = "Display complete details of a specific task including the vehicle, customer, and all interventions with their workflow steps. Use the task ID to retrieve. Essential for understanding a job's scope and progress."
    )]
    async fn show_task(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.show_task(params).await
    }

    #[tool(
        name = "assign_technician",
        description = "Assign a technician to a task by name. A pending task becomes 'assigned'; tasks that already progressed keep their status and only change the assignee."
    )]
    async fn assign_technician(&self, params: Parameters<AssignTechnician>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.assign_technician(params).await
    }

    #[tool(
        name = "cancel_task",
        description = "Cancel a task that has not completed. Cancelled tasks are kept for the record but cannot start new interventions. Requires the admin role."
    )]
    async fn cancel_task(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.cancel_task(params).await
    }

    #[tool(
        name = "archive_task",
        description = "Archive a task to hide it from the active list. Archived tasks are preserved and can be restored later with unarchive_task. Use when a job is delivered or abandoned. Requires the admin role."
    )]
    async fn archive_task(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.archive_task(params).await
    }

    #[tool(
        name = "unarchive_task",
        description = "Restore an archived task back to the active list. The task, its interventions and photos are preserved exactly as they were. Requires the admin role."
    )]
    async fn unarchive_task(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.unarchive_task(params).await
    }

    #[tool(
        name = "purge_tasks",
        description = "Permanently delete ALL archived tasks with their interventions, steps and photos. This operation cannot be undone and requires confirmed=true plus the admin role. Consider leaving tasks archived instead."
    )]
    async fn purge_tasks(&self, params: Parameters<PurgeTasks>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.purge_tasks(params).await
    }

    #[tool(
        name = "sync_task",
        description = "Recompute a task's status and completion percentage from its latest intervention's steps. Returns a report with the completion percentage (settled steps over total). Use after steps advance to roll progress up to the task."
    )]
    async fn sync_task(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.sync_task(params).await
    }

    #[tool(
        name = "start_intervention",
        description = "Start a film installation on a task. Creates the fixed four-step workflow (inspection, preparation, installation, finalization) with inspection already active. Optionally record weather, location and the vehicle zones receiving film. Fails if the task already carries an unfinished intervention."
    )]
    async fn start_intervention(&self, params: Parameters<StartIntervention>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.start_intervention(params).await
    }

    #[tool(
        name = "show_intervention",
        description = "Display a specific intervention with its conditions (weather, location, zones) and all four workflow steps including collected data and photos."
    )]
    async fn show_intervention(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.show_intervention(params).await
    }

    #[tool(
        name = "show_active_intervention",
        description = "Display the latest intervention on a task, which is the one work happens on. Use the task ID. Tells you which workflow step is currently active."
    )]
    async fn show_active_intervention(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.show_active_intervention(params).await
    }

    #[tool(
        name = "pause_intervention",
        description = "Pause an in-progress intervention, for example while waiting for parts or the customer. While paused, steps cannot advance or be skipped. Resume with resume_intervention."
    )]
    async fn pause_intervention(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.pause_intervention(params).await
    }

    #[tool(
        name = "resume_intervention",
        description = "Resume a paused intervention so work can continue on the active step."
    )]
    async fn resume_intervention(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.resume_intervention(params).await
    }

    #[tool(
        name = "show_step",
        description = "View detailed information about a specific workflow step including its status, collected checklist data, photo URLs and skip reason if skipped."
    )]
    async fn show_step(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.show_step(params).await
    }

    #[tool(
        name = "list_steps",
        description = "List the workflow steps of a task's latest intervention in order, with each step's status. Use the task ID."
    )]
    async fn list_steps(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.list_steps(params).await
    }

    #[tool(
        name = "save_step_draft",
        description = "Save collected evidence on a step without completing it. 'data' is a JSON object that merges into what was previously saved (nested objects merge key by key); checklist items go under data.checklist as booleans. 'photo_urls' accumulate as a set. Repeated saves with the same content are harmless. Example:
        {
          \"step_id\": 3,
          \"data\": {\"checklist\": {\"surface_cleaned\": true}, \"notes\": \"clay bar used\"},
          \"photo_urls\": [\"photos/prep-01.jpg\"]
        }"
    )]
    async fn save_step_draft(&self, params: Parameters<SaveStepDraft>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.save_step_draft(params).await
    }

    #[tool(
        name = "advance_step",
        description = "Validate the active step against its completion rules (required checklist items plus a minimum photo count) and, when satisfied, complete it and activate the next step. On failure, the error names the exact unmet conditions, e.g. 'checklist.surface_degreased' or 'min_photos'. Only the in_progress step can advance."
    )]
    async fn advance_step(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.advance_step(params).await
    }

    #[tool(
        name = "skip_step",
        description = "Skip a workflow step that does not apply, recording a mandatory reason. Skipped steps count as settled for completion, so the workflow can finish around them. Settled steps cannot be skipped again."
    )]
    async fn skip_step(&self, params: Parameters<SkipStep>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.skip_step(params).await
    }

    #[tool(
        name = "attach_photo",
        description = "Register a photo on a task's photo registry. Requires task_id, path and kind ('before', 'during' or 'after'); optionally associate the photo with an intervention and step, and add a caption. Note this registry is separate from the per-step photo_urls used by validation."
    )]
    async fn attach_photo(&self, params: Parameters<AttachPhoto>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.attach_photo(params).await
    }

    #[tool(
        name = "list_photos",
        description = "List all photos registered on a task, with their kind, path, caption and associations."
    )]
    async fn list_photos(&self, params: Parameters<Id>) -> McpResult {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.list_photos(params).await
    }

    /// List all available prompts
    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.list_prompts(request, context).await
    }

    /// Get a specific prompt by name and apply arguments
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let handlers = handlers::McpHandlers::new(self.workshop.clone());
        handlers.get_prompt(request, context).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LaminaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "lamina".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(r#"Lamina manages paint protection film (PPF) jobs in a workshop: vehicles come in as tasks, each film installation is an intervention, and every intervention walks a fixed four-step workflow.

## Core Concepts
- **Tasks**: One vehicle and customer per job, with status (pending/assigned/in_progress/completed/cancelled/archived)
- **Interventions**: One film installation attempt on a task, recording weather, location and the zones receiving film
- **Steps**: The fixed workflow of every intervention: inspection, preparation, installation, finalization. Each step gates completion on required checklist items and a minimum photo count

## Workflow Examples

### Taking in a Vehicle
1. Register it with `create_task` - vehicle, plate, customer
2. Assign a technician with `assign_technician`
3. Start the work with `start_intervention` - the inspection step activates automatically

### Working Through the Steps
1. Use `show_active_intervention` to see which step is active
2. Record evidence with `save_step_draft` as work progresses - drafts merge, save early and often
3. Call `advance_step` when the technician reports done; failures name the exact missing conditions
4. Use `skip_step` with a reason when a step genuinely does not apply
5. After the last step, `sync_task` rolls the completion up to the task

### Housekeeping
- `pause_intervention` / `resume_intervention` when a job waits on parts or the customer
- `archive_task` delivered jobs, `purge_tasks` (admin, confirmed=true) to clear the archive
- `attach_photo` keeps the task's photo registry for before/during/after documentation

## Tool Categories
- **Task Management**: create_task, list_tasks, show_task, assign_technician, cancel_task, archive_task, unarchive_task, purge_tasks, sync_task
- **Intervention Lifecycle**: start_intervention, show_intervention, show_active_intervention, pause_intervention, resume_intervention
- **Step Workflow**: show_step, list_steps, save_step_draft, advance_step, skip_step
- **Photo Registry**: attach_photo, list_photos

## Validation Rules
Each step kind has a fixed gate: inspection needs exterior_inspected + damage_recorded and 2 photos; preparation needs surface_cleaned + surface_degreased and 1 photo; installation needs film_applied + edges_sealed and 2 photos; finalization needs final_inspection_passed + customer_notified and 3 photos. Checklist items live under data.checklist in the step draft."#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.get_prompt(request, context).await
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: LaminaMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Lamina MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    // Set up signal handlers for graceful shutdown
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

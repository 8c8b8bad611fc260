//! MCP tool handlers implementation

use std::sync::Arc;

use lamina_core::{
    display::{CreateResult, OperationStatus, UpdateResult},
    params as core, Workshop,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageContent,
        PromptMessageRole,
    },
    service::RequestContext,
    ErrorData as McpError, ErrorData, RoleServer,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{errors::to_mcp_error, prompts::prompt_templates};

// ============================================================================
// Generic Parameter Wrapper Implementation
// ============================================================================
//
// This generic wrapper implements the parameter wrapper pattern for the MCP
// side: it wraps any core parameter type in a transparent serde container,
// adding the Deserialize and JsonSchema derives the protocol needs while the
// core types stay free of framework dependencies.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type Id = McpParams<core::Id>;
pub type CreateTask = McpParams<core::CreateTask>;
pub type ListTasks = McpParams<core::ListTasks>;
pub type AssignTechnician = McpParams<core::AssignTechnician>;
pub type PurgeTasks = McpParams<core::PurgeTasks>;
pub type StartIntervention = McpParams<core::StartIntervention>;
pub type SaveStepDraft = McpParams<core::SaveStepDraft>;
pub type SkipStep = McpParams<core::SkipStep>;
pub type AttachPhoto = McpParams<core::AttachPhoto>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text_result(text: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    workshop: Arc<Mutex<Workshop>>,
}

impl McpHandlers {
    pub fn new(workshop: Arc<Mutex<Workshop>>) -> Self {
        Self { workshop }
    }

    pub async fn create_task(&self, Parameters(params): Parameters<CreateTask>) -> McpResult {
        debug!("create_task: {:?}", params);

        let task = self
            .workshop
            .lock()
            .await
            .create_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create task", &e))?;

        text_result(CreateResult::new(task).to_string())
    }

    pub async fn list_tasks(&self, Parameters(params): Parameters<ListTasks>) -> McpResult {
        debug!("list_tasks: {:?}", params);

        let workshop = self.workshop.lock().await;
        let inner_params = params.as_ref();
        let summaries = workshop
            .list_tasks(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;

        let title = if summaries.is_empty() {
            if inner_params.archived {
                "No archived tasks found"
            } else {
                "No active tasks found"
            }
        } else if inner_params.archived {
            "Archived Tasks"
        } else {
            "Active Tasks"
        };

        text_result(format!("# {}\n\n{}", title, summaries))
    }

    pub async fn show_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_task: {:?}", params);

        let task = self
            .workshop
            .lock()
            .await
            .get_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get task", &e))?
            .ok_or_else(|| {
                ErrorData::internal_error(
                    format!("Task with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;

        text_result(task.to_string())
    }

    pub async fn assign_technician(
        &self,
        Parameters(params): Parameters<AssignTechnician>,
    ) -> McpResult {
        debug!("assign_technician: {:?}", params);

        let workshop = self.workshop.lock().await;
        let inner_params = params.as_ref();
        let task = workshop
            .assign_technician(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to assign technician", &e))?;

        let result = UpdateResult::with_changes(
            task,
            vec![format!(
                "Assigned technician '{}'",
                inner_params.technician
            )],
        );
        text_result(result.to_string())
    }

    pub async fn cancel_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("cancel_task: {:?}", params);

        let task = self
            .workshop
            .lock()
            .await
            .cancel_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to cancel task", &e))?;

        let result = OperationStatus::success(format!(
            "Cancelled task '{}' (ID: {}).",
            task.vehicle_label(),
            task.id
        ));
        text_result(result.to_string())
    }

    pub async fn archive_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("archive_task: {:?}", params);

        let task = self
            .workshop
            .lock()
            .await
            .archive_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to archive task", &e))?;

        let result = OperationStatus::success(format!(
            "Archived task with ID {}. Use 'unarchive_task' to restore it.",
            task.id
        ));
        text_result(result.to_string())
    }

    pub async fn unarchive_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("unarchive_task: {:?}", params);

        let task = self
            .workshop
            .lock()
            .await
            .unarchive_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to unarchive task", &e))?;

        let result = OperationStatus::success(format!(
            "Unarchived task with ID {}. Task is now {}.",
            task.id, task.status
        ));
        text_result(result.to_string())
    }

    pub async fn purge_tasks(&self, Parameters(params): Parameters<PurgeTasks>) -> McpResult {
        debug!("purge_tasks: {:?}", params);

        let purged = self
            .workshop
            .lock()
            .await
            .purge_archived_tasks(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to purge tasks", &e))?;

        let result = OperationStatus::success(format!(
            "Purged {purged} archived task(s). This action cannot be undone."
        ));
        text_result(result.to_string())
    }

    pub async fn sync_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("sync_task: {:?}", params);

        let report = self
            .workshop
            .lock()
            .await
            .sync_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to sync task", &e))?;

        text_result(report.to_string())
    }

    pub async fn start_intervention(
        &self,
        Parameters(params): Parameters<StartIntervention>,
    ) -> McpResult {
        debug!("start_intervention: {:?}", params);

        let intervention = self
            .workshop
            .lock()
            .await
            .start_intervention(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to start intervention", &e))?;

        text_result(CreateResult::new(intervention).to_string())
    }

    pub async fn show_intervention(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_intervention: {:?}", params);

        let intervention = self
            .workshop
            .lock()
            .await
            .get_intervention(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get intervention", &e))?
            .ok_or_else(|| {
                ErrorData::internal_error(
                    format!("Intervention with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;

        text_result(intervention.to_string())
    }

    pub async fn show_active_intervention(
        &self,
        Parameters(params): Parameters<Id>,
    ) -> McpResult {
        debug!("show_active_intervention: {:?}", params);

        let workshop = self.workshop.lock().await;
        let inner_params = params.as_ref();
        let intervention = workshop
            .show_active_intervention(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to get intervention", &e))?;

        match intervention {
            Some(intervention) => text_result(intervention.to_string()),
            None => text_result(format!(
                "Task {} has no interventions yet. Use 'start_intervention' to begin one.",
                inner_params.id
            )),
        }
    }

    pub async fn pause_intervention(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("pause_intervention: {:?}", params);

        let intervention = self
            .workshop
            .lock()
            .await
            .pause_intervention(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to pause intervention", &e))?;

        let result = OperationStatus::success(format!(
            "Paused intervention {}. Step writes are blocked until it is resumed.",
            intervention.id
        ));
        text_result(result.to_string())
    }

    pub async fn resume_intervention(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("resume_intervention: {:?}", params);

        let intervention = self
            .workshop
            .lock()
            .await
            .resume_intervention(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to resume intervention", &e))?;

        let result = OperationStatus::success(format!(
            "Resumed intervention {}. Work can continue on the active step.",
            intervention.id
        ));
        text_result(result.to_string())
    }

    pub async fn show_step(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_step: {:?}", params);

        let step = self
            .workshop
            .lock()
            .await
            .get_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get step", &e))?
            .ok_or_else(|| {
                ErrorData::internal_error(
                    format!("Step with ID {} not found", params.as_ref().id),
                    None,
                )
            })?;

        text_result(step.to_string())
    }

    pub async fn list_steps(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("list_steps: {:?}", params);

        let steps = self
            .workshop
            .lock()
            .await
            .list_steps(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list steps", &e))?;

        text_result(steps.to_string())
    }

    pub async fn save_step_draft(
        &self,
        Parameters(params): Parameters<SaveStepDraft>,
    ) -> McpResult {
        debug!("save_step_draft: {:?}", params);

        let step = self
            .workshop
            .lock()
            .await
            .save_step_draft(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to save step draft", &e))?;

        let result = UpdateResult::with_changes(step, vec!["Saved draft".to_string()]);
        text_result(result.to_string())
    }

    pub async fn advance_step(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("advance_step: {:?}", params);

        let outcome = self
            .workshop
            .lock()
            .await
            .advance_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to advance step", &e))?;

        text_result(outcome.to_string())
    }

    pub async fn skip_step(&self, Parameters(params): Parameters<SkipStep>) -> McpResult {
        debug!("skip_step: {:?}", params);

        let outcome = self
            .workshop
            .lock()
            .await
            .skip_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to skip step", &e))?;

        text_result(outcome.to_string())
    }

    pub async fn attach_photo(&self, Parameters(params): Parameters<AttachPhoto>) -> McpResult {
        debug!("attach_photo: {:?}", params);

        let photo = self
            .workshop
            .lock()
            .await
            .attach_photo(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to attach photo", &e))?;

        text_result(CreateResult::new(photo).to_string())
    }

    pub async fn list_photos(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("list_photos: {:?}", params);

        let photos = self
            .workshop
            .lock()
            .await
            .list_photos(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list photos", &e))?;

        text_result(photos.to_string())
    }

    /// List all available prompts
    pub async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = prompt_templates()
            .iter()
            .map(|template| {
                Prompt::new(
                    &template.name,
                    Some(&template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.clone(),
                                title: None,
                                description: Some(arg.description.clone()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    /// Get a specific prompt by name and apply arguments
    pub async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let templates = prompt_templates();
        let template = templates
            .iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let mut prompt_text = template.template.clone();

        // Apply argument substitution if arguments are provided
        if let Some(args) = &request.arguments {
            for arg_def in &template.arguments {
                if let Some(arg_value) = args.get(&arg_def.name) {
                    if let Some(arg_str) = arg_value.as_str() {
                        let placeholder = format!("{{{}}}", arg_def.name);
                        prompt_text = prompt_text.replace(&placeholder, arg_str);
                    } else if arg_def.required {
                        return Err(McpError::invalid_params(
                            format!("Argument '{}' must be a string", arg_def.name),
                            None,
                        ));
                    }
                } else if arg_def.required {
                    return Err(McpError::invalid_params(
                        format!("Required argument '{}' is missing", arg_def.name),
                        None,
                    ));
                }
            }
        } else {
            // Check if any required arguments are missing
            let required_args: Vec<_> = template
                .arguments
                .iter()
                .filter(|arg| arg.required)
                .map(|arg| arg.name.as_str())
                .collect();
            if !required_args.is_empty() {
                return Err(McpError::invalid_params(
                    format!("Required arguments missing: {}", required_args.join(", ")),
                    None,
                ));
            }
        }

        Ok(GetPromptResult {
            description: Some(template.description.clone()),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(prompt_text),
            }],
        })
    }
}

//! Prompt templates for MCP server

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub template: String,
    pub arguments: Vec<PromptTemplateArg>,
}

/// Get predefined prompt templates for workshop operations
pub fn prompt_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            name: "intake".to_string(),
            description: "Register a vehicle and prepare its film installation".to_string(),
            template: r#"You are the **Lamina intake assistant** for a paint protection film workshop.

# Vehicle
{vehicle}

# Your Task
Register this vehicle and prepare it for a film installation using Lamina's MCP tools.

## Step 1: Check Existing Tasks
Use `list_tasks` (optionally with the `plate` filter) to check whether this vehicle already has an open task. Never create a duplicate task for the same plate.

## Step 2: Register the Task
Use `create_task` with:
- **vehicle_make / vehicle_model / vehicle_plate**: taken from the vehicle description
- **customer_name**: the customer, ask if missing
- **customer_phone**: (optional)
- **scheduled_at**: (optional) RFC 3339 timestamp of the appointment
- **technician**: (optional) assign immediately if one was named

## Step 3: Start the Intervention
When the vehicle is in the shop, use `start_intervention` with the task ID and:
- **zones**: the vehicle zones receiving film, e.g. ["hood", "front bumper"]
- **weather** and **location**: record the working conditions

This creates the four-step workflow (inspection, preparation, installation, finalization) with inspection already active.

## Output
Report the task ID, the intervention ID, and which step is active."#
                .to_string(),
            arguments: vec![PromptTemplateArg {
                name: "vehicle".to_string(),
                description: "Description of the vehicle: make, model, plate, and customer"
                    .to_string(),
                required: true,
            }],
        },
        PromptTemplate {
            name: "install".to_string(),
            description: "Walk a film installation through its workflow steps".to_string(),
            template: r#"You are guiding a technician through a paint protection film installation tracked by Lamina.

# Task
Task ID: {task_id}

# Workflow Rules
Each step carries a quality gate: required checklist items under `collected_data.checklist` and a minimum photo count. A step can only advance when its gate is satisfied; a failed advance reports the exact unmet conditions.

## Step 1: Review the Work
Call `show_active_intervention(id: task_id)` to see the current intervention and which step is active.

## Step 2: Collect Evidence
For the active step, use `save_step_draft` as the technician works:
- Set checklist items to true under `data.checklist` as they are verified
- Add photo URLs to `photo_urls` as photos are taken

Drafts merge, so save early and often. Repeated saves with the same content are harmless.

## Step 3: Advance
When the technician reports the step done, call `advance_step`. If it fails, the error lists the unmet conditions, e.g. `checklist.surface_degreased` or `min_photos`. Collect the missing evidence and retry.

If a step genuinely does not apply, use `skip_step` with a concrete reason instead.

## Step 4: Finish
When the last step settles, the intervention completes. Call `sync_task` to roll the completion back up to the task, then report the completion percentage to the customer."#
                .to_string(),
            arguments: vec![PromptTemplateArg {
                name: "task_id".to_string(),
                description: "The ID of the task being installed".to_string(),
                required: true,
            }],
        },
    ]
}

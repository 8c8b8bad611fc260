//! Lamina CLI Application
//!
//! Command-line interface for the Lamina paint-protection-film workshop
//! manager.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use lamina_core::{params::ListTasks, WorkshopBuilder};
use log::info;
use mcp::{run_stdio_server, LaminaMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        role,
        command,
    } = Args::parse();

    let workshop = WorkshopBuilder::new()
        .with_database_path(database_file)
        .with_role(role.into())
        .build()
        .await
        .context("Failed to initialize workshop")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Lamina started");

    match command {
        Some(Task { command }) => {
            Cli::new(workshop, renderer)
                .handle_task_command(command)
                .await
        }
        Some(Intervention { command }) => {
            Cli::new(workshop, renderer)
                .handle_intervention_command(command)
                .await
        }
        Some(Step { command }) => {
            Cli::new(workshop, renderer)
                .handle_step_command(command)
                .await
        }
        Some(Photo { command }) => {
            Cli::new(workshop, renderer)
                .handle_photo_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting Lamina MCP server");
            run_stdio_server(LaminaMcpServer::new(workshop))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(workshop, renderer)
                .list_tasks(ListTasks::default())
                .await
        }
    }
}

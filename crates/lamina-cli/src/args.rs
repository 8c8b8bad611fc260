use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lamina_core::models::Role;

use crate::cli::{InterventionCommands, PhotoCommands, StepCommands, TaskCommands};

/// Main command-line interface for the Lamina workshop manager
///
/// Lamina tracks paint-protection-film jobs as tasks, each carrying
/// interventions that walk a technician through a fixed four-step workflow
/// (inspection, preparation, installation, finalization). It provides a
/// command-line interface for registering vehicles, recording step evidence,
/// and advancing the workflow, with support for both local CLI operations
/// and MCP (Model Context Protocol) server mode for integration with AI
/// assistants.
#[derive(Parser)]
#[command(version, about, name = "lam")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/lamina/lamina.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Role to run commands as
    #[arg(long, global = true, value_enum, default_value_t = RoleArg::Technician)]
    pub role: RoleArg,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Lamina CLI
///
/// The CLI is organized into five main command categories:
/// - `task`: Operations for managing workshop tasks (create, list, assign,
///   archive, etc.)
/// - `intervention`: Film installation lifecycle (start, pause, resume)
/// - `step`: Operations on workflow steps (drafts, advance, skip)
/// - `photo`: The photo registry attached to tasks
/// - `serve`: Start the MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage workshop tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage film installation interventions
    #[command(alias = "i")]
    Intervention {
        #[command(subcommand)]
        command: InterventionCommands,
    },
    /// Manage workflow steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Manage task photos
    #[command(alias = "ph")]
    Photo {
        #[command(subcommand)]
        command: PhotoCommands,
    },
    /// Start the MCP server
    Serve,
}

/// Command-line argument representation of caller roles
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum RoleArg {
    /// Read-only access
    Viewer,
    /// Day-to-day workshop operations
    Technician,
    /// Full access including destructive maintenance
    Admin,
}

impl std::fmt::Display for RoleArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Viewer => "viewer",
            Self::Technician => "technician",
            Self::Admin => "admin",
        };
        write!(f, "{name}")
    }
}

impl From<RoleArg> for Role {
    fn from(val: RoleArg) -> Self {
        match val {
            RoleArg::Viewer => Role::Viewer,
            RoleArg::Technician => Role::Technician,
            RoleArg::Admin => Role::Admin,
        }
    }
}

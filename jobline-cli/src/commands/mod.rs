//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod artifacts;
mod jobs;

pub use artifacts::ArtifactCommands;
pub use jobs::JobCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use jobline_client::JobsApi;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job management
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Job artifacts
    Artifacts {
        #[command(subcommand)]
        command: ArtifactCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let api = JobsApi::new(&config.client).context("Failed to create API client")?;

    match command {
        Commands::Jobs { command } => jobs::handle_job_command(command, api, config).await,
        Commands::Artifacts { command } => {
            artifacts::handle_artifact_command(command, api, config).await
        }
    }
}

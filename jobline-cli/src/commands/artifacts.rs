//! Artifact command handlers

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use jobline_client::JobsApi;
use jobline_engine::ArtifactSync;

use crate::config::Config;
use crate::console::{ConsoleReporter, print_json_pretty};

/// Artifact subcommands
#[derive(Subcommand)]
pub enum ArtifactCommands {
    /// List the files a job produced
    List { job_id: String },
    /// Download a job's artifacts
    Get {
        job_id: String,

        /// Destination directory (default: current directory)
        #[arg(long)]
        dest: Option<String>,
    },
    /// Delete a job's artifacts
    Destroy { job_id: String },
}

/// Handle artifact commands
///
/// # Arguments
/// * `command` - The artifact command to execute
/// * `api` - Router for the job service
/// * `config` - The CLI configuration
pub async fn handle_artifact_command(
    command: ArtifactCommands,
    api: JobsApi,
    config: &Config,
) -> Result<()> {
    match command {
        ArtifactCommands::List { job_id } => {
            print_json_pretty(&api.artifacts_list(&job_id).await?);
            Ok(())
        }
        ArtifactCommands::Get { job_id, dest } => {
            fetch_artifacts(api, config, &job_id, dest.as_deref()).await
        }
        ArtifactCommands::Destroy { job_id } => {
            print_json_pretty(&api.artifacts_destroy(&job_id).await?);
            Ok(())
        }
    }
}

/// Download every artifact of a job into `dest`
async fn fetch_artifacts(
    api: JobsApi,
    config: &Config,
    job_id: &str,
    dest: Option<&str>,
) -> Result<()> {
    let sync = ArtifactSync::new(api, Arc::new(config.connector()));

    let synced = sync
        .sync(job_id, dest, &ConsoleReporter)
        .await
        .with_context(|| format!("Failed to download artifacts for job {}", job_id))?;

    if !synced {
        bail!("No artifacts were downloaded for job {}", job_id);
    }

    Ok(())
}

//! Job command handlers
//!
//! Handles job submission, inspection, lifecycle actions and log access.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use jobline_client::JobsApi;
use jobline_core::domain::job::{Job, JobState};
use jobline_core::dto::job::CreateJob;
use jobline_engine::{JobRunner, LogTail, Polled, RunOutcome, TailOptions, Waiter};

use crate::config::Config;
use crate::console::{ConsoleReporter, print_job_details, print_json_pretty};
use crate::types::parse_param;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a job and follow it until it finishes
    Create {
        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        machine_type: Option<String>,

        /// Container image to run
        #[arg(long)]
        container: Option<String>,

        /// Command to run inside the container
        #[arg(long)]
        command: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// Directory or archive to upload, or "none"
        #[arg(long)]
        workspace: Option<String>,

        /// Extra service parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List jobs
    List {
        /// Filter parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Show job details
    Show { job_id: String },
    /// Stop a running job
    Stop { job_id: String },
    /// Delete a job
    Destroy { job_id: String },
    /// Submit a copy of a job
    Clone { job_id: String },
    /// Print job logs
    Logs {
        job_id: String,

        /// Line to start from
        #[arg(long, default_value_t = 0)]
        line: u64,

        /// Keep following until the log stream ends
        #[arg(long)]
        tail: bool,

        /// Print the records as JSON once the fetch is done
        #[arg(long)]
        json: bool,
    },
    /// Wait for a job to reach a state
    Wait {
        job_id: String,

        /// State to wait for
        #[arg(long, default_value = "Running")]
        state: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `api` - Router for the job service
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, api: JobsApi, config: &Config) -> Result<()> {
    match command {
        JobCommands::Create {
            project,
            machine_type,
            container,
            command,
            name,
            workspace,
            params,
        } => {
            let request = CreateJob {
                project,
                machine_type,
                container,
                command,
                name,
                workspace,
                extra: params.into_iter().collect(),
            };
            create_job(api, config, request).await
        }
        JobCommands::List { params } => {
            print_json_pretty(&api.get_jobs(params.into_iter().collect()).await?);
            Ok(())
        }
        JobCommands::Show { job_id } => show_job(&api, &job_id).await,
        JobCommands::Stop { job_id } => {
            print_json_pretty(&api.stop(&job_id).await?);
            Ok(())
        }
        JobCommands::Destroy { job_id } => {
            print_json_pretty(&api.destroy(&job_id).await?);
            Ok(())
        }
        JobCommands::Clone { job_id } => {
            print_json_pretty(&api.clone_job(&job_id).await?);
            Ok(())
        }
        JobCommands::Logs {
            job_id,
            line,
            tail,
            json,
        } => {
            let options = TailOptions { line, follow: tail };
            job_logs(api, config, &job_id, options, json).await
        }
        JobCommands::Wait { job_id, state } => {
            wait_for_state(api, config, &job_id, JobState::from(state)).await
        }
    }
}

/// Submit a job and follow it to completion
async fn create_job(api: JobsApi, config: &Config, request: CreateJob) -> Result<()> {
    let runner = JobRunner::new(api, config.engine.clone());
    let outcome = runner
        .run(request, &ConsoleReporter)
        .await
        .context("Job run failed")?;

    if let RunOutcome::Aborted { stage, .. } = outcome {
        bail!("Job run aborted at the {:?} stage", stage);
    }

    Ok(())
}

/// Get and display a single job
async fn show_job(api: &JobsApi, job_id: &str) -> Result<()> {
    match Job::decode(api.get_job(job_id).await?) {
        Ok(job) => print_job_details(&job),
        Err(payload) => print_json_pretty(&payload),
    }
    Ok(())
}

/// Print job logs, either as they arrive or as one JSON document
async fn job_logs(
    api: JobsApi,
    config: &Config,
    job_id: &str,
    options: TailOptions,
    json: bool,
) -> Result<()> {
    let tail = LogTail::new(api, config.engine.clone());

    if json {
        let lines = tail.collect(job_id, options).await;
        print_json_pretty(&serde_json::to_value(lines)?);
    } else {
        if options.follow {
            eprintln!("{}", format!("Following logs for job {}...", job_id).dimmed());
        }
        tail.print(job_id, options, &ConsoleReporter).await;
    }

    Ok(())
}

/// Block until a job reaches `state` (or can no longer get there)
async fn wait_for_state(
    api: JobsApi,
    config: &Config,
    job_id: &str,
    state: JobState,
) -> Result<()> {
    let waiter = Waiter::new(api, config.engine.clone());

    match waiter.wait_for(job_id, &state).await? {
        Polled::Job(job) => {
            print_json_pretty(&serde_json::to_value(&job)?);
            Ok(())
        }
        Polled::Malformed(payload) => {
            print_json_pretty(&payload);
            bail!("Unexpected reply while waiting for job {}", job_id)
        }
    }
}

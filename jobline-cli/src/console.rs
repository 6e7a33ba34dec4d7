//! Terminal output
//!
//! Writes engine progress and command results to the terminal.

use std::path::Path;

use colored::*;
use jobline_core::domain::job::{Job, JobState};
use jobline_core::domain::log::LogLine;
use jobline_engine::{Reporter, RunStage, describe_outcome};
use serde_json::Value;

/// Prints engine progress to stdout, failures to stderr
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn job_submitted(&self, job: &Job) {
        println!("New jobId: {}", job.id.cyan());
    }

    fn job_state(&self, job: &Job) {
        println!("Job {}", colorize_state(&job.state));
    }

    fn waiting_for_start(&self, _job: &Job) {
        println!("{}", "Waiting for job to run...".dimmed());
    }

    fn awaiting_logs(&self, _job: &Job) {
        println!("{}", "Awaiting logs...".dimmed());
    }

    fn log_line(&self, line: &LogLine) {
        println!("{}", line.message);
    }

    fn job_finished(&self, job: &Job) {
        let summary = describe_outcome(job);
        match (&job.state, job.exit_code) {
            (JobState::Error, _) => println!("{}", summary.red()),
            (_, Some(0)) => println!("{}", summary.green()),
            _ => println!("{}", summary.yellow()),
        }
    }

    fn stage_failed(&self, stage: RunStage, payload: &Value) {
        eprintln!("{}", format!("✗ {:?} failed:", stage).red());
        eprintln!("{}", to_pretty(payload));
    }

    fn destination_not_directory(&self, dest: &Path) {
        eprintln!(
            "{}",
            format!("✗ Destination is not a directory: {}", dest.display()).red()
        );
    }

    fn nothing_to_fetch(&self, job_id: &str) {
        println!("{}", format!("No artifacts found for job {}.", job_id).yellow());
    }

    fn downloading(&self, file: &str) {
        println!("Downloading {}", file.cyan());
    }

    fn object_missing(&self, key: &str) {
        println!("{}", format!("⚠ {} not found, skipping", key).yellow());
    }

    fn download_complete(&self) {
        println!("{}", "✓ Download complete".green());
    }
}

/// Print a payload as two-space indented JSON with sorted keys
pub fn print_json_pretty(value: &Value) {
    println!("{}", to_pretty(value));
}

// serde_json objects are BTreeMap-backed, so keys come out sorted.
fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print detailed job information
pub fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:           {}", job.id.cyan());
    println!("  State:        {}", colorize_state(&job.state));

    let fields = [
        ("Name", &job.name),
        ("Project", &job.project),
        ("Machine Type", &job.machine_type),
        ("Container", &job.container),
        ("Command", &job.command),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {:<13} {}", format!("{}:", label), value);
        }
    }

    if let Some(created) = job.dt_created {
        println!("  Created:      {}", created.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(started) = job.dt_started {
        println!("  Started:      {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(finished) = job.dt_finished {
        println!("  Finished:     {}", finished.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = job.dt_started {
            let duration = finished.signed_duration_since(started);
            println!("  Duration:     {}s", duration.num_seconds());
        }
    }

    if let Some(code) = job.exit_code {
        println!("  Exit Code:    {}", code);
    }

    if let Some(error) = &job.job_error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

/// Colorize job state for display
fn colorize_state(state: &JobState) -> ColoredString {
    let state_str = state.as_str();
    match state {
        JobState::Pending => state_str.yellow(),
        JobState::Running => state_str.cyan(),
        JobState::Stopped => state_str.green(),
        JobState::Error | JobState::Failed => state_str.red(),
        JobState::Other(_) => state_str.dimmed(),
    }
}

//! Progress reporting
//!
//! The engine never prints. Everything a user should see goes through a
//! [`Reporter`]; the CLI writes to the terminal, tests record.

use std::path::Path;

use jobline_core::domain::job::{Job, JobState};
use jobline_core::domain::log::LogLine;
use serde_json::Value;

use crate::service::RunStage;

/// Receives user-facing progress from the engine
pub trait Reporter: Send + Sync {
    /// A job was accepted by the service
    fn job_submitted(&self, job: &Job);

    /// Latest known state of a job being run
    fn job_state(&self, job: &Job);

    /// The run is waiting for a pending job to start
    fn waiting_for_start(&self, job: &Job);

    /// The run is about to follow the job's logs
    fn awaiting_logs(&self, job: &Job);

    /// One log line (never the end-of-stream marker)
    fn log_line(&self, line: &LogLine);

    /// The run finished with this final snapshot
    fn job_finished(&self, job: &Job);

    /// The service answered a run stage with something other than a job
    fn stage_failed(&self, stage: RunStage, payload: &Value);

    /// Artifact destination exists but is not a directory
    fn destination_not_directory(&self, dest: &Path);

    /// The job has no artifacts to fetch
    fn nothing_to_fetch(&self, job_id: &str);

    /// An artifact download is starting
    fn downloading(&self, file: &str);

    /// An artifact was listed but its object is gone
    fn object_missing(&self, key: &str);

    /// All listed artifacts were processed
    fn download_complete(&self);
}

/// Final one-line summary of a finished job
pub fn describe_outcome(job: &Job) -> String {
    if job.state == JobState::Error {
        format!(
            "Job {}: {}",
            job.state,
            job.job_error.as_deref().unwrap_or("unknown error")
        )
    } else {
        match job.exit_code {
            Some(code) => format!("Job {}; exitCode {}", job.state, code),
            None => format!("Job {}; exitCode none", job.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_outcome() {
        let stopped = Job::decode(json!({ "id": "j", "state": "Stopped", "exitCode": 0 })).unwrap();
        assert_eq!(describe_outcome(&stopped), "Job Stopped; exitCode 0");

        let errored =
            Job::decode(json!({ "id": "j", "state": "Error", "jobError": "OOM" })).unwrap();
        assert_eq!(describe_outcome(&errored), "Job Error: OOM");

        let failed = Job::decode(json!({ "id": "j", "state": "Failed" })).unwrap();
        assert_eq!(describe_outcome(&failed), "Job Failed; exitCode none");
    }
}

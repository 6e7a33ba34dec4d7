//! Lifecycle waiter
//!
//! Polls a job at a fixed interval until it reaches a wanted state or can no
//! longer get there.

use jobline_client::JobsApi;
use jobline_core::domain::job::{Job, JobState};
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;

/// Result of polling a job
#[derive(Debug, Clone, PartialEq)]
pub enum Polled {
    /// Last snapshot observed
    Job(Job),
    /// The service answered with something that is not a job
    Malformed(Value),
}

/// Polls job state at a fixed interval
#[derive(Debug, Clone)]
pub struct Waiter {
    api: JobsApi,
    config: EngineConfig,
}

impl Waiter {
    pub fn new(api: JobsApi, config: EngineConfig) -> Self {
        Self { api, config }
    }

    /// Poll until the job reaches `target` or a terminal state
    ///
    /// A malformed reply ends the wait immediately and is returned as-is.
    pub async fn wait_for(&self, job_id: &str, target: &JobState) -> Result<Polled> {
        loop {
            let mut job = match Job::decode(self.api.get_job(job_id).await?) {
                Ok(job) => job,
                Err(payload) => return Ok(Polled::Malformed(payload)),
            };
            if job.id.is_empty() {
                job.id = job_id.to_string();
            }

            if reached(&job.state, target) {
                return Ok(Polled::Job(job));
            }

            debug!(
                "Job {} is {}, waiting for {}; next poll in {:?}",
                job_id, job.state, target, self.config.poll_interval
            );
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

/// Whether a wait for `target` is over once the job is in `state`
///
/// A job already running has moved past pending, and terminal states never
/// change again.
pub fn reached(state: &JobState, target: &JobState) -> bool {
    state == target
        || (*state == JobState::Running && *target == JobState::Pending)
        || state.is_terminal()
}

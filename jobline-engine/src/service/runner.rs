//! Job run controller
//!
//! Submit a job, wait for it to start, follow its logs to the end and report
//! how it finished. Each stage talks to the service once or in a loop; a
//! stage that gets back something other than a job stops the run and hands
//! that payload to the caller.

use jobline_client::JobsApi;
use jobline_core::domain::job::{Job, JobState};
use jobline_core::dto::job::CreateJob;
use serde_json::Value;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::report::Reporter;
use crate::service::tail::{LogTail, TailOptions};
use crate::service::waiter::{Polled, Waiter};

/// Stage of a run that can stop it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Job creation
    Submit,
    /// Waiting for the job to leave `Pending`
    Wait,
    /// Fetching the final snapshot after the logs ended
    Finalize,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The job finished; this is its final snapshot
    Completed(Job),
    /// The service answered `stage` with a payload that is not a job
    Aborted { stage: RunStage, payload: Value },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Drives a job from submission to its final state
#[derive(Debug, Clone)]
pub struct JobRunner {
    api: JobsApi,
    waiter: Waiter,
    tail: LogTail,
}

impl JobRunner {
    pub fn new(api: JobsApi, config: EngineConfig) -> Self {
        Self {
            waiter: Waiter::new(api.clone(), config.clone()),
            tail: LogTail::new(api.clone(), config),
            api,
        }
    }

    /// Submit `request` and follow the job until it is done
    pub async fn run(&self, request: CreateJob, reporter: &dyn Reporter) -> Result<RunOutcome> {
        let mut job = match Job::decode_created(self.api.create_job(request).await?) {
            Ok(job) => job,
            Err(payload) => return Ok(abort(RunStage::Submit, payload, reporter)),
        };
        info!("Submitted job {} ({})", job.id, job.state);
        reporter.job_submitted(&job);
        reporter.job_state(&job);

        if job.state == JobState::Pending {
            reporter.waiting_for_start(&job);
            job = match self.waiter.wait_for(&job.id, &JobState::Running).await? {
                Polled::Job(job) => job,
                Polled::Malformed(payload) => return Ok(abort(RunStage::Wait, payload, reporter)),
            };
            reporter.job_state(&job);
        }

        if job.state != JobState::Error {
            reporter.awaiting_logs(&job);
            self.tail.print(&job.id, TailOptions::follow(), reporter).await;

            let job_id = job.id;
            job = match Job::decode(self.api.get_job(&job_id).await?) {
                Ok(job) => job,
                Err(payload) => return Ok(abort(RunStage::Finalize, payload, reporter)),
            };
            if job.id.is_empty() {
                job.id = job_id;
            }
        }

        info!("Job {} finished in state {}", job.id, job.state);
        reporter.job_finished(&job);
        Ok(RunOutcome::Completed(job))
    }
}

fn abort(stage: RunStage, payload: Value, reporter: &dyn Reporter) -> RunOutcome {
    reporter.stage_failed(stage, &payload);
    RunOutcome::Aborted { stage, payload }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingReporter, ScriptedTransport, api};
    use serde_json::json;

    const CREATE: &str = "/jobs/createJob";
    const GET_JOB: &str = "/jobs/getJob";
    const LOGS: &str = "/jobs/logs";

    fn runner(transport: &std::sync::Arc<ScriptedTransport>) -> JobRunner {
        JobRunner::new(api(transport), EngineConfig::default())
    }

    fn request() -> CreateJob {
        CreateJob {
            project: Some("demo".to_string()),
            command: Some("python3 hello.py".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run() {
        let transport = ScriptedTransport::new();
        transport
            .reply(CREATE, json!({ "id": "js1", "state": "Pending" }))
            .reply(GET_JOB, json!({ "id": "js1", "state": "Pending" }))
            .reply(GET_JOB, json!({ "id": "js1", "state": "Running" }))
            .reply(
                LOGS,
                json!([
                    { "line": 0, "message": "hello" },
                    { "line": 1, "message": "PSEOF" },
                ]),
            )
            .reply(GET_JOB, json!({ "id": "js1", "state": "Stopped", "exitCode": 0 }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(
            reporter.lines(),
            vec![
                "New jobId: js1",
                "Job Pending",
                "Waiting for job to run...",
                "Job Running",
                "Awaiting logs...",
                "hello",
                "Job Stopped; exitCode 0",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_stops_run() {
        let transport = ScriptedTransport::new();
        transport.reply(CREATE, json!({ "error": "quota exceeded" }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Aborted {
                stage: RunStage::Submit,
                payload: json!({ "error": "quota exceeded" }),
            }
        );
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(reporter.lines().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_in_error_skips_logs() {
        let transport = ScriptedTransport::new();
        transport.reply(
            CREATE,
            json!({ "id": "js2", "state": "Error", "jobError": "invalid machine type" }),
        );
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(transport.count(LOGS), 0);
        assert_eq!(transport.count(GET_JOB), 0);
        assert_eq!(
            reporter.lines().last().map(String::as_str),
            Some("Job Error: invalid machine type")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_wait_aborts() {
        let transport = ScriptedTransport::new();
        transport
            .reply(CREATE, json!({ "id": "js3", "state": "Pending" }))
            .reply(GET_JOB, json!({ "message": "Unauthorized" }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Aborted { stage: RunStage::Wait, .. }
        ));
        assert_eq!(transport.count(LOGS), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_final_snapshot_aborts() {
        let transport = ScriptedTransport::new();
        transport
            .reply(CREATE, json!({ "id": "js4", "state": "Running" }))
            .reply(LOGS, json!([{ "line": 0, "message": "PSEOF" }]))
            .reply(GET_JOB, json!({ "error": "gone" }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Aborted {
                stage: RunStage::Finalize,
                payload: json!({ "error": "gone" }),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_odd_descriptive_fields_do_not_abort() {
        let transport = ScriptedTransport::new();
        transport
            .reply(CREATE, json!({ "id": "js5", "state": "Pending", "name": 7 }))
            .reply(GET_JOB, json!({ "state": "Running", "project": { "id": "pr1" } }))
            .reply(LOGS, json!([{ "line": 0, "message": "PSEOF" }]))
            .reply(GET_JOB, json!({ "state": "Stopped", "exitCode": "0" }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        match outcome {
            RunOutcome::Completed(job) => {
                assert_eq!(job.id, "js5");
                assert_eq!(job.exit_code, Some(0));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            transport.requests().last().map(|r| r.query["jobId"].clone()),
            Some("js5".to_string())
        );
        assert_eq!(
            reporter.lines().last().map(String::as_str),
            Some("Job Stopped; exitCode 0")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_without_id_aborts() {
        let transport = ScriptedTransport::new();
        transport.reply(CREATE, json!({ "state": "Pending" }));
        let reporter = RecordingReporter::default();

        let outcome = runner(&transport).run(request(), &reporter).await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Aborted {
                stage: RunStage::Submit,
                payload: json!({ "state": "Pending" }),
            }
        );
        assert_eq!(transport.count(GET_JOB), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_on_submit_is_error() {
        let transport = ScriptedTransport::new();
        transport.fail(CREATE, 500);
        let reporter = RecordingReporter::default();

        let result = runner(&transport).run(request(), &reporter).await;
        assert!(result.is_err());
        assert!(reporter.lines().is_empty());
    }
}

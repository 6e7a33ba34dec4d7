//! Test doubles shared by the service tests

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobline_client::{ApiRequest, ClientError, JobsApi, Transport};
use jobline_core::domain::job::Job;
use jobline_core::domain::log::LogLine;
use serde_json::Value;

use crate::report::{Reporter, describe_outcome};
use crate::service::RunStage;

enum Scripted {
    Reply(Value),
    Fail(u16),
}

/// Answers each path from its own queue of scripted replies
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, payload: Value) -> &Self {
        self.push(path, Scripted::Reply(payload))
    }

    pub fn fail(&self, path: &str, status: u16) -> &Self {
        self.push(path, Scripted::Fail(status))
    }

    fn push(&self, path: &str, scripted: Scripted) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> jobline_client::Result<Value> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(payload)) => Ok(payload),
            Some(Scripted::Fail(status)) => Err(ClientError::api_error(status, "scripted failure")),
            None => Err(ClientError::ParseError(format!(
                "no scripted reply left for {}",
                path
            ))),
        }
    }
}

pub fn api(transport: &Arc<ScriptedTransport>) -> JobsApi {
    JobsApi::with_transport(transport.clone())
}

/// Keeps every report as the line a terminal would show
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

impl Reporter for RecordingReporter {
    fn job_submitted(&self, job: &Job) {
        self.push(format!("New jobId: {}", job.id));
    }

    fn job_state(&self, job: &Job) {
        self.push(format!("Job {}", job.state));
    }

    fn waiting_for_start(&self, _job: &Job) {
        self.push("Waiting for job to run...".to_string());
    }

    fn awaiting_logs(&self, _job: &Job) {
        self.push("Awaiting logs...".to_string());
    }

    fn log_line(&self, line: &LogLine) {
        self.push(line.message.clone());
    }

    fn job_finished(&self, job: &Job) {
        self.push(describe_outcome(job));
    }

    fn stage_failed(&self, stage: RunStage, payload: &Value) {
        self.push(format!("{:?} failed: {}", stage, payload));
    }

    fn destination_not_directory(&self, dest: &Path) {
        self.push(format!("Not a directory: {}", dest.display()));
    }

    fn nothing_to_fetch(&self, job_id: &str) {
        self.push(format!("No artifacts for {}", job_id));
    }

    fn downloading(&self, file: &str) {
        self.push(format!("Downloading {}", file));
    }

    fn object_missing(&self, key: &str) {
        self.push(format!("Missing {}", key));
    }

    fn download_complete(&self) {
        self.push("Download complete".to_string());
    }
}

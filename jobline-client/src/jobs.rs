//! Job command routing
//!
//! Maps each logical job operation to exactly one transport call.

use jobline_core::dto::Params;
use jobline_core::dto::job::{
    CreateJob, JOB_ID, LINE, WORKSPACE, WORKSPACE_FILE_NAME, job_params,
};
use serde_json::Value;
use tracing::debug;

use crate::JobsApi;
use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Host, Method};
use crate::workspace::{self, NO_WORKSPACE};

/// Path category every job operation lives under
const CATEGORY: &str = "jobs";

/// Operations the job service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOperation {
    GetJobs,
    GetJob,
    GetLogs,
    ArtifactsList,
    ArtifactsGet,
    ArtifactsDestroy,
    Clone,
    Stop,
    Destroy,
    CreateJob,
}

impl JobOperation {
    /// Name the service uses for this operation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOperation::GetJobs => "getJobs",
            JobOperation::GetJob => "getJob",
            JobOperation::GetLogs => "getLogs",
            JobOperation::ArtifactsList => "artifactsList",
            JobOperation::ArtifactsGet => "artifactsGet",
            JobOperation::ArtifactsDestroy => "artifactsDestroy",
            JobOperation::Clone => "clone",
            JobOperation::Stop => "stop",
            JobOperation::Destroy => "destroy",
            JobOperation::CreateJob => "createJob",
        }
    }

    fn is_read(&self) -> bool {
        matches!(
            self,
            JobOperation::GetJobs
                | JobOperation::GetJob
                | JobOperation::GetLogs
                | JobOperation::ArtifactsList
                | JobOperation::ArtifactsGet
        )
    }

    /// Operations addressed at an existing job carry its id in the path
    fn targets_job(&self) -> bool {
        matches!(
            self,
            JobOperation::Clone
                | JobOperation::Stop
                | JobOperation::Destroy
                | JobOperation::ArtifactsDestroy
        )
    }
}

impl JobsApi {
    // =============================================================================
    // Routing
    // =============================================================================

    /// Perform one operation and return the service's reply unchanged
    pub async fn call(&self, operation: JobOperation, params: Params) -> Result<Value> {
        let request = route(operation, params)?;
        self.transport.send(request).await
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a new job, packaging and attaching its workspace if one is given
    pub async fn create_job(&self, req: CreateJob) -> Result<Value> {
        self.call(JobOperation::CreateJob, req.into_params()).await
    }

    /// Get a job by ID
    pub async fn get_job(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::GetJob, job_params(job_id)).await
    }

    /// List jobs, optionally filtered by service-side parameters
    pub async fn get_jobs(&self, filter: Params) -> Result<Value> {
        self.call(JobOperation::GetJobs, filter).await
    }

    /// Stop a running job
    pub async fn stop(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::Stop, job_params(job_id)).await
    }

    /// Delete a job
    pub async fn destroy(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::Destroy, job_params(job_id)).await
    }

    /// Submit a copy of an existing job
    pub async fn clone_job(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::Clone, job_params(job_id)).await
    }

    // =============================================================================
    // Job Logs
    // =============================================================================

    /// Fetch log records starting at `line`
    pub async fn get_logs(&self, job_id: &str, line: u64) -> Result<Value> {
        let mut params = job_params(job_id);
        params.insert(LINE.to_string(), line.to_string());
        self.call(JobOperation::GetLogs, params).await
    }

    // =============================================================================
    // Artifacts
    // =============================================================================

    /// List the files a job produced
    pub async fn artifacts_list(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::ArtifactsList, job_params(job_id))
            .await
    }

    /// Obtain scoped storage credentials for a job's artifacts
    pub async fn artifacts_get(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::ArtifactsGet, job_params(job_id)).await
    }

    /// Delete a job's artifacts
    pub async fn artifacts_destroy(&self, job_id: &str) -> Result<Value> {
        self.call(JobOperation::ArtifactsDestroy, job_params(job_id))
            .await
    }
}

/// Decide host, verb, path and parameter shape for an operation
///
/// Job creation with a workspace packages it here, so this may write a
/// temporary archive.
pub fn route(operation: JobOperation, mut params: Params) -> Result<ApiRequest> {
    let name = operation.as_str();

    let (host, method, path) = if operation == JobOperation::GetLogs {
        (Host::Logs, Method::Get, format!("/{}/logs", CATEGORY))
    } else if operation.is_read() {
        (Host::Api, Method::Get, format!("/{}/{}", CATEGORY, name))
    } else if operation.targets_job() {
        let job_id = params.remove(JOB_ID).ok_or_else(|| {
            ClientError::InvalidRequest(format!("{} requires a {}", name, JOB_ID))
        })?;
        (Host::Api, Method::Post, format!("/{}/{}/{}", CATEGORY, job_id, name))
    } else {
        (Host::Api, Method::Post, format!("/{}/{}", CATEGORY, name))
    };

    let mut file = None;
    if operation == JobOperation::CreateJob {
        let workspace = params
            .get(WORKSPACE)
            .filter(|ws| !ws.is_empty() && ws.as_str() != NO_WORKSPACE)
            .cloned();

        if let Some(workspace) = workspace {
            let archive = workspace::resolve(&workspace)?;
            let file_name = archive
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Attaching workspace archive {}", archive.display());

            params.insert(WORKSPACE_FILE_NAME.to_string(), file_name);
            params.remove(WORKSPACE);
            file = Some(archive);
        }
    }

    Ok(ApiRequest {
        host,
        method,
        path,
        query: params,
        file,
    })
}

//! Job DTOs

use serde::{Deserialize, Serialize};

use super::Params;

/// Wire name of the job identifier parameter
pub const JOB_ID: &str = "jobId";
/// Wire name of the log cursor parameter
pub const LINE: &str = "line";
/// Wire name of the local workspace parameter on job creation
pub const WORKSPACE: &str = "workspace";
/// Wire name the packaged workspace archive is announced under
pub const WORKSPACE_FILE_NAME: &str = "workspaceFileName";

/// Request to create a new job
///
/// Unset fields are left for the service to default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    pub project: Option<String>,
    pub machine_type: Option<String>,
    pub container: Option<String>,
    pub command: Option<String>,
    pub name: Option<String>,
    /// Local directory or file to upload as the job's workspace
    pub workspace: Option<String>,
    /// Additional service parameters, passed through verbatim
    #[serde(default)]
    pub extra: Params,
}

impl CreateJob {
    /// Flatten into the parameter map the service expects
    ///
    /// Named fields win over entries of the same name in `extra`.
    pub fn into_params(self) -> Params {
        let mut params = self.extra;
        let named = [
            ("project", self.project),
            ("machineType", self.machine_type),
            ("container", self.container),
            ("command", self.command),
            ("name", self.name),
            (WORKSPACE, self.workspace),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        }
        params
    }
}

/// Parameters addressing a single job
pub fn job_params(job_id: &str) -> Params {
    Params::from([(JOB_ID.to_string(), job_id.to_string())])
}

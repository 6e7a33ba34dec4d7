//! Artifact domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A file a job left in its artifact namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFile {
    /// Path relative to the job's artifact root
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Scoped object-storage access for one job's artifacts
///
/// Issued per fetch; never written anywhere.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageCredentials {
    pub bucket: String,
    pub folder: String,
    #[serde(rename = "Credentials")]
    pub credentials: SessionCredentials,
}

impl StorageCredentials {
    /// Object key of an artifact inside the scoped folder
    pub fn object_key(&self, file: &str) -> String {
        format!("{}/{}", self.folder, file)
    }
}

/// Temporary session keys
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

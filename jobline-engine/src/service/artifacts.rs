//! Artifact sync
//!
//! Mirrors a job's artifacts into a local directory: list what the job
//! produced, get scoped storage credentials for it, download every object.
//! Objects that vanished between listing and download are skipped; any other
//! storage failure ends the sync.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use jobline_client::JobsApi;
use jobline_client::workspace::expand_home;
use jobline_core::domain::artifact::{ArtifactFile, StorageCredentials};
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::error::Result;
use crate::report::Reporter;
use crate::storage::{StorageError, StoreConnector};

/// Downloads job artifacts through scoped credentials
#[derive(Clone)]
pub struct ArtifactSync {
    api: JobsApi,
    connector: Arc<dyn StoreConnector>,
}

impl ArtifactSync {
    pub fn new(api: JobsApi, connector: Arc<dyn StoreConnector>) -> Self {
        Self { api, connector }
    }

    /// Download every artifact of `job_id` below `dest` (default: current dir)
    ///
    /// Returns `false` when there was nothing to fetch or the destination is
    /// unusable; individual missing objects do not change the result.
    pub async fn sync(
        &self,
        job_id: &str,
        dest: Option<&str>,
        reporter: &dyn Reporter,
    ) -> Result<bool> {
        let dest = match dest {
            Some(dest) => std::path::absolute(expand_home(dest))?,
            None => std::env::current_dir()?,
        };

        if dest.exists() {
            if !dest.is_dir() {
                reporter.destination_not_directory(&dest);
                return Ok(false);
            }
        } else {
            fs::create_dir_all(&dest).await?;
        }

        let files = match decode::<Vec<ArtifactFile>>(self.api.artifacts_list(job_id).await?) {
            Some(files) if !files.is_empty() => files,
            _ => {
                reporter.nothing_to_fetch(job_id);
                return Ok(false);
            }
        };

        let Some(credentials) =
            decode::<StorageCredentials>(self.api.artifacts_get(job_id).await?)
        else {
            warn!("No usable storage credentials for job {}", job_id);
            return Ok(false);
        };

        self.download_all(&files, &credentials, &dest, reporter)
            .await?;

        reporter.download_complete();
        Ok(true)
    }

    async fn download_all(
        &self,
        files: &[ArtifactFile],
        credentials: &StorageCredentials,
        dest: &Path,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let store = self.connector.connect(credentials);
        info!(
            "Downloading {} artifact(s) from {}/{}",
            files.len(),
            credentials.bucket,
            credentials.folder
        );

        for artifact in files {
            let Some(dest_file) = local_path(dest, &artifact.file) else {
                warn!("Skipping artifact outside the destination: {}", artifact.file);
                continue;
            };

            if let Some(parent) = dest_file.parent() {
                fs::create_dir_all(parent).await?;
            }

            let key = credentials.object_key(&artifact.file);
            reporter.downloading(&artifact.file);

            match store.download(&key, &dest_file).await {
                Ok(()) => {}
                Err(StorageError::NotFound { key }) => reporter.object_missing(&key),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Option<T> {
    serde_json::from_value(payload).ok()
}

/// Destination of an artifact, if its path stays inside `dest`
fn local_path(dest: &Path, file: &str) -> Option<PathBuf> {
    let relative = Path::new(file);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    (contained && !file.is_empty()).then(|| dest.join(relative))
}

//! S3-backed object store

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use jobline_core::domain::artifact::StorageCredentials;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use super::{ObjectStore, StorageError, StoreConnector};

/// Region used when the caller does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Builds S3 clients from the session credentials the service issues
#[derive(Debug, Clone)]
pub struct S3Connector {
    region: String,
    endpoint: Option<String>,
}

impl S3Connector {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
        }
    }

    /// Talk to an S3-compatible endpoint instead of AWS (path-style addressing)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl Default for S3Connector {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl StoreConnector for S3Connector {
    fn connect(&self, credentials: &StorageCredentials) -> Box<dyn ObjectStore> {
        let session = &credentials.credentials;
        let provider = Credentials::new(
            session.access_key_id.clone(),
            session.secret_access_key.clone(),
            Some(session.session_token.clone()),
            None,
            "jobline-artifacts",
        );

        let mut builder = aws_sdk_s3::config::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(provider);

        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Box::new(S3ObjectStore {
            client: S3Client::from_conf(builder.build()),
            bucket: credentials.bucket.clone(),
        })
    }
}

/// One bucket, read through scoped credentials
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(key, err))?;

        let written = persist(response.body.into_async_read(), dest)
            .await
            .map_err(|e| StorageError::other(key, e))?;

        debug!(bucket = %self.bucket, key = %key, bytes = written, "Object downloaded");
        Ok(())
    }
}

/// Stream `body` into `dest` through a sibling `.part` file
///
/// `dest` is only replaced once the whole body arrived; a failed transfer
/// removes the partial file and leaves any previous `dest` untouched.
async fn persist<R: AsyncRead>(body: R, dest: &Path) -> io::Result<u64> {
    let mut body = std::pin::pin!(body);
    let partial = partial_path(dest);

    let result = async {
        let mut file = fs::File::create(&partial).await?;
        let written = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&partial, dest).await?;
        Ok::<_, io::Error>(written)
    }
    .await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(&partial).await {
            debug!("Could not remove {}: {}", partial.display(), e);
        }
    }
    result
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// A missing key is the only storage failure the sync tolerates
fn classify(key: &str, err: SdkError<GetObjectError>) -> StorageError {
    let missing = err
        .as_service_error()
        .is_some_and(GetObjectError::is_no_such_key)
        || err
            .raw_response()
            .is_some_and(|response| response.status().as_u16() == 404);

    if missing {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::other(key, aws_sdk_s3::error::DisplayErrorContext(&err))
    }
}

//! Object storage
//!
//! Artifact bytes live in object storage the job service hands out scoped
//! credentials for. The sync only needs "download this key to that path",
//! so that is the whole port.
//!
//! Both traits are object-safe so the sync can run against fakes in tests.

mod s3;

pub use s3::{DEFAULT_REGION, S3Connector, S3ObjectStore};

use std::path::Path;

use async_trait::async_trait;
use jobline_core::domain::artifact::StorageCredentials;
use thiserror::Error;

/// Errors raised by an object store
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist; the sync skips it
    #[error("The object does not exist: {key}")]
    NotFound { key: String },

    /// Anything else; the sync aborts
    #[error("Failed to download {key}: {message}")]
    Other { key: String, message: String },
}

impl StorageError {
    pub fn other(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Other {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

/// Read access to one bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Downloads `key` into the file at `dest`, replacing it
    async fn download(&self, key: &str, dest: &Path) -> Result<(), StorageError>;
}

/// Opens an [`ObjectStore`] from scoped credentials
pub trait StoreConnector: Send + Sync {
    fn connect(&self, credentials: &StorageCredentials) -> Box<dyn ObjectStore>;
}

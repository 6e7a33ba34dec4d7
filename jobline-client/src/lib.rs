//! Jobline HTTP Client
//!
//! A thin, typed client for the remote job service: routes each job operation
//! to one HTTP call against the control-plane or log host, and packages local
//! workspaces for upload.
//!
//! # Example
//!
//! ```no_run
//! use jobline_client::{ClientConfig, JobsApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new(
//!         "my-api-key",
//!         "http://localhost:8080",
//!         "http://localhost:8081",
//!     );
//!     let api = JobsApi::new(&config)?;
//!
//!     let job = api.get_job("js123").await?;
//!     println!("{}", job);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;
mod transport;
pub mod workspace;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use jobs::{JobOperation, route};
pub use transport::{ApiRequest, Host, HttpTransport, Method, Transport};

use std::sync::Arc;

/// Router for the job service API
///
/// Cheap to clone; every clone shares the same transport.
#[derive(Clone)]
pub struct JobsApi {
    transport: Arc<dyn Transport>,
}

impl JobsApi {
    /// Create a router backed by HTTP
    ///
    /// # Arguments
    /// * `config` - Hosts and API key; validated here
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a router over any transport
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use jobline_client::{ClientConfig, HttpTransport, JobsApi};
    ///
    /// let config = ClientConfig::new("key", "http://localhost:8080", "http://localhost:8081");
    /// let transport = HttpTransport::new(&config).unwrap();
    /// let api = JobsApi::with_transport(Arc::new(transport));
    /// ```
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl std::fmt::Debug for JobsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobsApi").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_creation() {
        let config = ClientConfig::new("key", "http://localhost:8080", "http://localhost:8081");
        assert!(JobsApi::new(&config).is_ok());
    }

    #[test]
    fn test_api_rejects_bad_url() {
        let config = ClientConfig::new("key", "localhost:8080", "http://localhost:8081");
        assert!(JobsApi::new(&config).is_err());
    }
}

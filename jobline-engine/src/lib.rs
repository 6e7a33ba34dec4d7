//! Jobline Engine
//!
//! Long-running client-side workflows on top of [`jobline_client`]: following
//! job logs, waiting for lifecycle transitions, running a job end to end and
//! syncing its artifacts from object storage.
//!
//! # Example
//!
//! ```no_run
//! use jobline_client::{ClientConfig, JobsApi};
//! use jobline_engine::{EngineConfig, LogTail, TailOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = JobsApi::new(&ClientConfig::new(
//!         "my-api-key",
//!         "http://localhost:8080",
//!         "http://localhost:8081",
//!     ))?;
//!
//!     let tail = LogTail::new(api, EngineConfig::default());
//!     for line in tail.collect("js123", TailOptions::follow()).await {
//!         println!("{}", line.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod service;
pub mod storage;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use report::{Reporter, describe_outcome};
pub use service::{
    ArtifactSync, JobRunner, LogTail, Polled, RunOutcome, RunStage, TailOptions, Waiter,
};
pub use storage::{ObjectStore, S3Connector, StorageError, StoreConnector};

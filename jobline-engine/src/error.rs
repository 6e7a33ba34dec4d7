//! Error types for the Jobline engine

use jobline_client::ClientError;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures that stop an engine operation
///
/// Payloads the service sends back in an unexpected shape are not errors;
/// they come back as values (see [`RunOutcome`](crate::RunOutcome) and
/// [`Polled`](crate::Polled)).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport failure or caller error raised by the client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Object storage failure other than a missing object
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

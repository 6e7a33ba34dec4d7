//! Error types for the Jobline client

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Jobline client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code without a JSON body
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The workspace to upload could not be used
    #[error("Workspace {}: {reason}", path.display())]
    Workspace {
        /// Path as given by the caller, after home expansion
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workspace archive could not be written
    #[error("Failed to write workspace archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a workspace error
    pub fn workspace(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Workspace {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_error_message() {
        let err = ClientError::workspace("/tmp/missing", "does not exist");
        assert_eq!(err.to_string(), "Workspace /tmp/missing: does not exist");
    }
}

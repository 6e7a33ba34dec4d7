//! Client configuration
//!
//! Connection settings for the two service hosts. Passed explicitly to
//! [`HttpTransport`](crate::HttpTransport); nothing is read from globals.

use crate::error::{ClientError, Result};

/// Default control-plane URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default log host URL
pub const DEFAULT_LOG_URL: &str = "http://localhost:8081";

/// Connection settings for the job service
#[derive(Clone)]
pub struct ClientConfig {
    /// Sent as `x-api-key` on every request
    pub api_key: String,

    /// Control-plane host for job and artifact operations
    pub api_url: String,

    /// Host serving job log streams
    pub log_url: String,
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        log_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            log_url: log_url.into(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "api_key cannot be empty".to_string(),
            ));
        }

        for (name, url) in [("api_url", &self.api_url), ("log_url", &self.log_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::InvalidRequest(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("log_url", &self.log_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::new("key", DEFAULT_API_URL, DEFAULT_LOG_URL);
        assert!(config.validate().is_ok());

        config.api_key = "  ".to_string();
        assert!(config.validate().is_err());

        config.api_key = "key".to_string();
        config.log_url = "logs.example.com".to_string();
        assert!(config.validate().is_err());

        config.log_url = "https://logs.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ClientConfig::new("sekrit", DEFAULT_API_URL, DEFAULT_LOG_URL);
        assert!(!format!("{:?}", config).contains("sekrit"));
    }
}

//! Configuration module
//!
//! Gathers client, engine and storage settings from flags and environment.

use anyhow::{Context, Result};
use jobline_client::ClientConfig;
use jobline_engine::{EngineConfig, S3Connector};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosts and API key for the job service
    pub client: ClientConfig,

    /// Polling and backoff pacing
    pub engine: EngineConfig,

    /// Region of the artifact bucket
    pub storage_region: String,

    /// S3-compatible endpoint replacing AWS, if any
    pub storage_endpoint: Option<String>,
}

impl Config {
    pub fn new(
        api_key: String,
        api_url: String,
        log_url: String,
        storage_region: String,
        storage_endpoint: Option<String>,
    ) -> Result<Self> {
        let client = ClientConfig::new(api_key, api_url, log_url);
        client.validate().context("Invalid client configuration")?;

        let engine = EngineConfig::from_env();
        engine.validate().context("Invalid engine configuration")?;

        Ok(Self {
            client,
            engine,
            storage_region,
            storage_endpoint,
        })
    }

    /// Storage connector for the configured region and endpoint
    pub fn connector(&self) -> S3Connector {
        let connector = S3Connector::new(self.storage_region.clone());
        match &self.storage_endpoint {
            Some(endpoint) => connector.with_endpoint(endpoint.clone()),
            None => connector,
        }
    }
}

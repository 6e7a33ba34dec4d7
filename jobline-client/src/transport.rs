//! Transport layer
//!
//! One request, one parsed JSON reply. The router builds [`ApiRequest`]s and
//! hands them to a [`Transport`]; [`HttpTransport`] is the reqwest-backed
//! implementation, tests substitute their own.

use std::path::PathBuf;

use async_trait::async_trait;
use jobline_core::dto::Params;
use reqwest::{Client, StatusCode};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Which service host a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// Control plane: jobs and artifacts
    Api,
    /// Log streaming host
    Logs,
}

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully routed service call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub host: Host,
    pub method: Method,
    /// Path below the host root, starting with `/`
    pub path: String,
    /// Sent as the query string
    pub query: Params,
    /// Local file attached as the multipart field `file`
    pub file: Option<PathBuf>,
}

/// Performs routed calls against the job service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the parsed JSON reply
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// reqwest implementation of [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_url: String,
    log_url: String,
    api_key: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport from validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    /// Create a transport with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(config: &ClientConfig, client: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            log_url: config.log_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// Base URL serving the given host
    pub fn base_url(&self, host: Host) -> &str {
        match host {
            Host::Api => &self.api_url,
            Host::Logs => &self.log_url,
        }
    }

    async fn multipart(file: PathBuf) -> Result<Form> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace.zip".to_string());
        let bytes = tokio::fs::read(&file).await?;
        Ok(Form::new().part("file", Part::bytes(bytes).file_name(file_name)))
    }

    /// Handle an API response and parse its JSON body
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        decode_body(status, &body)
    }
}

/// Turn a status and raw body into the reply handed to callers
///
/// The service reports failures as JSON bodies; those are returned as-is
/// regardless of status so callers can inspect them.
fn decode_body(status: StatusCode, body: &str) -> Result<Value> {
    if body.trim().is_empty() && status.is_success() {
        return Ok(Value::Null);
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            if !status.is_success() {
                debug!("Service answered {} with a JSON body", status);
            }
            Ok(value)
        }
        Err(_) if !status.is_success() => Err(ClientError::api_error(status.as_u16(), body)),
        Err(e) => Err(ClientError::ParseError(format!(
            "Failed to parse JSON response: {}",
            e
        ))),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url(request.host), request.path);
        debug!("{:?} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let mut builder = builder
            .header("x-api-key", &self.api_key)
            .query(&request.query);

        if let Some(file) = request.file {
            builder = builder.multipart(Self::multipart(file).await?);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }
}

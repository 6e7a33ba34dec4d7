//! Jobline CLI
//!
//! Command-line interface for submitting, following and inspecting jobs on
//! the remote compute service.
//!
//! Job output and command results go to stdout; diagnostics go to stderr.

mod commands;
mod config;
mod console;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use jobline_client::config::{DEFAULT_API_URL, DEFAULT_LOG_URL};
use jobline_engine::storage::DEFAULT_REGION;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobline")]
#[command(about = "Remote compute job CLI", long_about = None)]
struct Cli {
    /// API key sent with every request
    #[arg(long, env = "JOBLINE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Control-plane URL
    #[arg(long, env = "JOBLINE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Log host URL
    #[arg(long, env = "JOBLINE_LOG_URL", default_value = DEFAULT_LOG_URL)]
    log_url: String,

    /// Region of the artifact bucket
    #[arg(long, env = "JOBLINE_STORAGE_REGION", default_value = DEFAULT_REGION)]
    storage_region: String,

    /// S3-compatible endpoint serving the artifact bucket
    #[arg(long, env = "JOBLINE_STORAGE_ENDPOINT")]
    storage_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        cli.api_key,
        cli.api_url,
        cli.log_url,
        cli.storage_region,
        cli.storage_endpoint,
    )?;
    debug!("Loaded configuration: {:?}", config);

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "jobline",
            "--api-key",
            "k",
            "jobs",
            "create",
            "--project",
            "demo",
            "--workspace",
            "none",
            "--param",
            "ports=8888",
        ])
        .unwrap();

        assert_eq!(cli.api_key, "k");
        assert_eq!(cli.api_url, DEFAULT_API_URL);
        assert!(matches!(cli.command, Commands::Jobs { .. }));
    }

    #[test]
    fn test_parse_artifacts_get() {
        let cli = Cli::try_parse_from([
            "jobline",
            "--api-key",
            "k",
            "--storage-region",
            "eu-west-1",
            "--storage-endpoint",
            "http://localhost:9000",
            "artifacts",
            "get",
            "js1",
            "--dest",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.storage_region, "eu-west-1");
        assert_eq!(
            cli.storage_endpoint.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(matches!(cli.command, Commands::Artifacts { .. }));
    }
}

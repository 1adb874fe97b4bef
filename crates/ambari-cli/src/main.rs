//! Ambari CLI - inspect and drive an Ambari-managed cluster.
//!
//! This is the entry point for the `ambari` binary.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ambari_client::{AmbariClient, ClientConfig, RetryPolicy};
use commands::Command;

/// Ambari CLI - inspect and drive an Ambari-managed cluster.
#[derive(Parser, Debug)]
#[command(name = "ambari")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file with client settings. Flags override its values.
    #[arg(long, env = "AMBARI_CONFIG")]
    config: Option<PathBuf>,

    /// Ambari server host.
    #[arg(long, env = "AMBARI_HOST")]
    host: Option<String>,

    /// Ambari server port.
    #[arg(long, env = "AMBARI_PORT")]
    port: Option<u16>,

    /// URL scheme, `http` or `https`.
    #[arg(long, env = "AMBARI_SCHEME")]
    scheme: Option<String>,

    /// User to authenticate as.
    #[arg(long, env = "AMBARI_USER")]
    user: Option<String>,

    /// Password for the user.
    #[arg(long, env = "AMBARI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "AMBARI_TIMEOUT")]
    timeout: Option<u64>,

    /// Attempts per read request.
    #[arg(long, env = "AMBARI_RETRIES")]
    retries: Option<u32>,

    /// Service catalog used by `add-service`.
    #[arg(long, env = "AMBARI_COMPONENTS", default_value = "components.yml")]
    components: PathBuf,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Build the client configuration from the config file and flags.
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(scheme) = &self.scheme {
            config.scheme.clone_from(scheme);
        }
        if let Some(user) = &self.user {
            config.username.clone_from(user);
        }
        if let Some(password) = &self.password {
            config.password.clone_from(password);
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_seconds = timeout;
        }
        if let Some(retries) = self.retries {
            config.retry = RetryPolicy {
                max_attempts: retries,
                ..config.retry
            };
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.debug {
        "info,ambari_client=debug,ambari_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Create client
    let config = args.client_config()?;
    tracing::debug!(config = ?config, "Loaded client configuration");
    let client = AmbariClient::new(&config).context("Failed to create Ambari client")?;

    args.command.run(client, &args.components).await
}

//! csctl - command-line access to the Apache CloudStack management API.
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`commands`] | Command handlers organized by subcommand |
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `call` | Issue any API command with `key=value` parameters |
//! | `job` | Show the current status of an async job |
//! | `wait` | Block until an async job finishes |

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cloudstack::{ClientConfig, CloudStackClient};
use tracing::debug;

/// csctl - Apache CloudStack API client
#[derive(Parser)]
#[command(name = "csctl")]
#[command(about = "csctl - Call the Apache CloudStack management API", long_about = None)]
struct Cli {
    /// YAML config file (api_url, api_key, secret_key, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Management server API endpoint
    #[arg(long, global = true, env = "CLOUDSTACK_API_URL")]
    api_url: Option<String>,

    /// API key
    #[arg(long, global = true, env = "CLOUDSTACK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Secret key used to sign requests
    #[arg(long, global = true, env = "CLOUDSTACK_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Seconds to wait for async jobs
    #[arg(long, global = true)]
    async_timeout: Option<u64>,

    /// Never use POST
    #[arg(long, global = true)]
    http_get_only: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    ssl_no_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue an API command
    Call {
        /// Command name, e.g. listVirtualMachines
        command: String,

        /// Parameters as KEY=VALUE
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Wait for the async job the command starts; without it the
        /// initial reply (with its jobid) is printed
        #[arg(long)]
        wait: bool,
    },
    /// Show the current status of an async job
    Job {
        /// Job ID
        job_id: String,
    },
    /// Wait for an async job to finish
    Wait {
        /// Job ID
        job_id: String,

        /// Seconds to wait (defaults to the configured async timeout)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_command(cli)
}

fn run_command(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    match cli.command {
        Commands::Call {
            command,
            params,
            wait,
        } => {
            let client = connect(call_config(config, wait))?;
            commands::call::run(&client, &command, &params)
        }
        Commands::Job { job_id } => {
            let client = connect(config)?;
            commands::jobs::status(&client, &job_id)
        }
        Commands::Wait { job_id, timeout } => {
            let timeout = timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.async_timeout());
            let client = connect(config)?;
            commands::jobs::wait(&client, &job_id, timeout)
        }
    }
}

/// Merge the config file (if any) with flags and environment values.
///
/// Flags win over the file.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            ClientConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => {
            let (Some(api_url), Some(api_key), Some(secret_key)) =
                (&cli.api_url, &cli.api_key, &cli.secret_key)
            else {
                bail!(
                    "Missing credentials: pass --config or set --api-url, --api-key and --secret-key"
                );
            };
            ClientConfig::new(api_url, api_key, secret_key)
        }
    };

    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(secret_key) = &cli.secret_key {
        config.secret_key = secret_key.clone();
    }
    if let Some(secs) = cli.async_timeout {
        config.async_timeout_secs = secs;
    }
    if cli.http_get_only {
        config.http_get_only = true;
    }
    if cli.ssl_no_verify {
        config.ssl_no_verify = true;
    }
    Ok(config)
}

/// `call` follows jobs only when asked to, whatever the config file says.
fn call_config(config: ClientConfig, wait: bool) -> ClientConfig {
    config.with_async_mode(wait)
}

fn connect(config: ClientConfig) -> Result<CloudStackClient> {
    CloudStackClient::new(config).context("Failed to create CloudStack client")
}

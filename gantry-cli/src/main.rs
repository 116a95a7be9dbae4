//! Gantry CLI
//!
//! Reconstructs how long each stage of a build pipeline took on given
//! reference dates and renders the result as a Gantt chart.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Build pipeline timing charts", long_about = None)]
struct Cli {
    /// Proxy for requests to the build server
    #[arg(long, env = "GANTRY_PROXY", global = true)]
    proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, env = "GANTRY_INSECURE", global = true)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GANTRY_TIMEOUT_SECS", default_value = "30", global = true)]
    timeout_secs: u64,

    /// Total lookup attempts per work item
    #[arg(long, env = "GANTRY_ATTEMPTS", default_value = "3", global = true)]
    attempts: u32,

    /// Disable the per-run lookup cache
    #[arg(long, env = "GANTRY_NO_CACHE", global = true)]
    no_cache: bool,

    /// Build server user name
    #[arg(long, env = "GANTRY_USER", global = true)]
    user: Option<String>,

    /// Build server API token
    #[arg(long, env = "GANTRY_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry=info,gantry_core=info,gantry_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        proxy: cli.proxy,
        insecure: cli.insecure,
        timeout: Duration::from_secs(cli.timeout_secs),
        attempts: cli.attempts,
        cache: !cli.no_cache,
        username: cli.user,
        api_token: cli.api_token,
    };
    config.validate()?;

    tracing::info!("Started");
    let result = handle_command(cli.command, &config).await;
    tracing::info!("Completed");

    result
}

//! mtls-gateway binary.
//!
//! Loads the TOML configuration, initializes logging, builds the route
//! table and the mutual-TLS transport, then serves until SIGINT/SIGTERM.
//! Any startup error ends the process with a non-zero exit code before
//! a single request is accepted.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mtls_gateway::config::load_config;
use mtls_gateway::lifecycle::{startup, Shutdown};
use mtls_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "mtls-gateway")]
#[command(about = "Path-prefix reverse proxy with mutual TLS to its backends", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mtls-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        "mtls-gateway starting"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    match startup::run(config, server_shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Gateway stopped");
            ExitCode::FAILURE
        }
    }
}

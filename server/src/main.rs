// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Accord Portal Server
//!
//! Binary entry point: parses the CLI, initializes logging, loads (or
//! defaults) configuration, and serves the portal router.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use portal_core::infrastructure::config::PortalConfig;
use portal_core::presentation::{app, AppState};

/// Accord account-management portal.
#[derive(Parser)]
#[command(name = "accord-portal")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file. Without one the server runs in
    /// local mode with the mock facade.
    #[arg(short, long, env = "PORTAL_CONFIG_PATH", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind address override, e.g. 0.0.0.0:8080
    #[arg(long, env = "PORTAL_BIND_ADDRESS")]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PORTAL_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let mut config = match &cli.config {
        Some(path) => PortalConfig::load(path)?,
        None => {
            info!("no config file given, running locally with the mock facade");
            PortalConfig::local()
        }
    };
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }

    let bind_address = config.bind_address.clone();
    let state = AppState::build(config)?;
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(address = %bind_address, "portal listening");
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

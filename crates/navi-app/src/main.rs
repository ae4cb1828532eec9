//! # Navi
//!
//! Command line front end for Navi playback sessions.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use navi_subsonic::SubsonicClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{log_filter, Cli};

fn configure_logging(level: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter(level)));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.debug.as_deref());

    info!("Starting Navi v{}", env!("CARGO_PKG_VERSION"));

    let client =
        SubsonicClient::new(cli.server.connection()).context("Invalid server configuration")?;
    commands::run(cli, client).await
}

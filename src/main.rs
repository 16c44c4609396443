//! logview - read-only web viewer for a directory of log files
//!
//! Lists every file under the data directory and serves whole-file reads,
//! tails and keyword searches as HTML pages and a JSON API.

mod api;
mod config;
mod error;
mod logfiles;
mod protocol;
mod server;
mod views;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, ServiceConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from(Cli::parse());

    if let Err(e) = server::run(config).await {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

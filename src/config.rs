use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::error::StartupError;
use crate::logfiles::config::LogFilesConfig;

/// Command-line flags, each with an environment fallback
#[derive(Debug, Parser)]
#[command(name = "logview", version, about = "Browse, tail and search log files over HTTP")]
pub struct Cli {
    /// Directory whose files are exposed
    #[arg(long, env = "DATA_DIR", default_value = "/data")]
    pub data_dir: PathBuf,

    /// Directory created at startup for service configuration
    #[arg(long, env = "CONFIG_DIR", default_value = "/config")]
    pub config_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Glob patterns (matched against names relative to the data directory)
    /// that are hidden from listings and refused on reads
    #[arg(long = "deny", env = "DENY_PATTERNS", value_delimiter = ',')]
    pub denied_patterns: Vec<String>,
}

/// Service configuration, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    pub bind: SocketAddr,
    pub denied_patterns: Vec<String>,
}

impl From<Cli> for ServiceConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir,
            config_dir: cli.config_dir,
            bind: SocketAddr::new(cli.host, cli.port),
            denied_patterns: cli.denied_patterns,
        }
    }
}

impl ServiceConfig {
    pub fn log_files(&self) -> LogFilesConfig {
        LogFilesConfig {
            denied_patterns: self.denied_patterns.clone(),
            ..LogFilesConfig::new(self.data_dir.clone())
        }
    }

    /// Create the config directory (and any missing parents)
    pub fn ensure_config_dir(&self) -> Result<(), StartupError> {
        std::fs::create_dir_all(&self.config_dir).map_err(|source| StartupError::ConfigDir {
            path: self.config_dir.clone(),
            source,
        })
    }
}

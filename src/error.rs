//! Error types shared across the service.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a caller-supplied file name could not be served.
///
/// Every variant is reported to HTTP callers as the same "not found"
/// response; the detail only ever reaches the process log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("path resolves outside the data directory: {attempted_path}")]
    OutsideRoot { attempted_path: String },

    #[error("path matches denied pattern {pattern}: {path}")]
    Denied { path: String, pattern: String },

    #[error("no such file: {path}")]
    NotFound { path: String },

    #[error("not a regular file: {path}")]
    NotAFile { path: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl AccessError {
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => AccessError::NotFound {
                path: path.display().to_string(),
            },
            _ => AccessError::Io {
                path: path.display().to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Conditions that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create config directory {path}: {source}")]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

use std::path::PathBuf;

/// Configuration for log file access
#[derive(Debug, Clone)]
pub struct LogFilesConfig {
    /// Directory all listings and reads are scoped to
    pub root: PathBuf,

    /// Denied file patterns (glob, relative to `root`)
    pub denied_patterns: Vec<String>,
}

impl LogFilesConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            denied_patterns: Vec::new(),
        }
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob_match::glob_match;
use path_jail::Jail;

use crate::error::AccessError;

use super::config::LogFilesConfig;

/// Resolves caller-supplied relative names against the data directory
pub struct PathValidator {
    config: Arc<LogFilesConfig>,
}

impl PathValidator {
    pub fn new(config: Arc<LogFilesConfig>) -> Self {
        Self { config }
    }

    /// Resolve `filename` to a canonical path inside the data directory.
    ///
    /// Both the candidate and the root are canonicalized on every call, so
    /// symlinks and `..` segments are followed before the containment check.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, AccessError> {
        let root = self
            .config
            .root
            .canonicalize()
            .map_err(|e| AccessError::from_io(&self.config.root, e))?;

        let candidate = self.config.root.join(filename);
        let canonical = candidate
            .canonicalize()
            .map_err(|e| AccessError::from_io(&candidate, e))?;

        if !is_contained(&root, &canonical) {
            tracing::warn!(
                "Security: attempted to access file outside data directory: {}",
                filename
            );
            return Err(AccessError::OutsideRoot {
                attempted_path: filename.to_string(),
            });
        }

        let relative = canonical.strip_prefix(&root).unwrap_or(canonical.as_path());
        if let Some(pattern) = self.denied_pattern_for(&relative_name(relative)) {
            return Err(AccessError::Denied {
                path: filename.to_string(),
                pattern: pattern.to_string(),
            });
        }

        Ok(canonical)
    }

    /// Check if a root-relative name matches a denied pattern
    pub fn is_denied(&self, name: &str) -> bool {
        self.denied_pattern_for(name).is_some()
    }

    fn denied_pattern_for(&self, name: &str) -> Option<&str> {
        self.config
            .denied_patterns
            .iter()
            .find(|pattern| glob_match(pattern, name))
            .map(String::as_str)
    }
}

/// Component-wise containment, so `/data2/x` is never inside `/data`.
fn is_contained(root: &Path, canonical: &Path) -> bool {
    if !canonical.starts_with(root) {
        return false;
    }
    match Jail::new(root) {
        Ok(jail) => jail.contains(canonical).is_ok(),
        Err(_) => false,
    }
}

/// Render a root-relative path with `/` separators
pub fn relative_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

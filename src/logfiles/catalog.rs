use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use walkdir::WalkDir;

use crate::protocol::FileRecord;

use super::config::LogFilesConfig;
use super::security::{relative_name, PathValidator};

/// Category reported for files directly under the data directory
pub const ROOT_CATEGORY: &str = "root";

/// A file that was seen during a scan but could not be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one recursive walk of the data directory
#[derive(Debug, Default)]
pub struct CatalogScan {
    pub records: Vec<FileRecord>,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Clone)]
pub struct LogCatalog {
    validator: Arc<PathValidator>,
    config: Arc<LogFilesConfig>,
}

impl LogCatalog {
    pub fn new(validator: Arc<PathValidator>, config: Arc<LogFilesConfig>) -> Self {
        Self { validator, config }
    }

    /// Walk the data directory and record every regular file in it.
    ///
    /// Records are sorted most recently modified first. A missing root yields
    /// an empty scan; anything that fails along the way becomes a warning.
    pub fn scan(&self) -> CatalogScan {
        let root = self.config.root.as_path();
        let mut scan = CatalogScan::default();

        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                scan.warnings.push(ScanWarning {
                    path: root.to_path_buf(),
                    message: "data directory is not a directory".to_string(),
                });
                return scan;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return scan,
            Err(e) => {
                scan.warnings.push(ScanWarning {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
                return scan;
            }
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    scan.warnings.push(ScanWarning {
                        path: e.path().unwrap_or(root).to_path_buf(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            // Follows symlinks, so links to regular files are listed
            let metadata = match fs::metadata(entry.path()) {
                Ok(meta) => meta,
                Err(e) => {
                    scan.warnings.push(ScanWarning {
                        path: entry.path().to_path_buf(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let name = relative_name(relative);
            if self.validator.is_denied(&name) {
                continue;
            }

            match build_record(entry.path(), relative, name, &metadata) {
                Ok(record) => scan.records.push(record),
                Err(warning) => scan.warnings.push(warning),
            }
        }

        sort_records(&mut scan.records);
        scan
    }

    /// Scan and route warnings to the log
    pub fn list_files(&self) -> Vec<FileRecord> {
        let scan = self.scan();
        for warning in &scan.warnings {
            tracing::warn!(
                "Error processing file {}: {}",
                warning.path.display(),
                warning.message
            );
        }
        scan.records
    }

    /// `list_files` on the blocking pool
    pub async fn snapshot(&self) -> Vec<FileRecord> {
        let catalog = self.clone();
        match tokio::task::spawn_blocking(move || catalog.list_files()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Catalog scan task failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn build_record(
    path: &Path,
    relative: &Path,
    name: String,
    metadata: &Metadata,
) -> Result<FileRecord, ScanWarning> {
    let modified = metadata.modified().map_err(|e| ScanWarning {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| name.clone());

    let category = match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => relative_name(parent),
        _ => ROOT_CATEGORY.to_string(),
    };

    Ok(FileRecord {
        name,
        display_name,
        absolute_path: path.display().to_string(),
        size_bytes: metadata.len(),
        modified_at: DateTime::<Local>::from(modified),
        category,
    })
}

fn sort_records(records: &mut [FileRecord]) {
    records.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}

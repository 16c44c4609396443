//! JSON response bodies
//!
//! Field names follow the wire format the log viewer's clients expect.

use chrono::{DateTime, Local};
use serde::Serialize;

/// One file discovered under the data directory
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path relative to the data directory, `/`-separated
    pub name: String,
    /// Final path component of `name`
    pub display_name: String,
    #[serde(rename = "path")]
    pub absolute_path: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "modified")]
    pub modified_at: DateTime<Local>,
    /// Parent directory of `name`, or `"root"` for top-level files
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineMatch {
    pub line_number: usize,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub success: bool,
    pub logs: Vec<FileRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LogContentResponse {
    pub success: bool,
    pub filename: String,
    pub content: String,
    pub lines: usize,
}

#[derive(Debug, Serialize)]
pub struct TailResponse {
    pub success: bool,
    pub filename: String,
    pub lines: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub filename: String,
    pub query: String,
    pub matches: Vec<LineMatch>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: &'static str,
    pub data_dir: String,
    pub config_dir: String,
    pub log_count: usize,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

use std::sync::Arc;

use tokio::fs;

use crate::error::AccessError;

use super::security::PathValidator;

/// Lines returned by a tail when the caller does not ask for a count
pub const DEFAULT_TAIL_LINES: usize = 100;

#[derive(Clone)]
pub struct LogOperations {
    validator: Arc<PathValidator>,
}

impl LogOperations {
    pub fn new(validator: Arc<PathValidator>) -> Self {
        Self { validator }
    }

    /// Read a whole file as text
    pub async fn read_file(&self, filename: &str) -> Result<String, AccessError> {
        let path = self.validator.resolve(filename)?;

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| AccessError::from_io(&path, e))?;
        if !metadata.is_file() {
            return Err(AccessError::NotAFile {
                path: path.display().to_string(),
            });
        }

        let buffer = fs::read(&path)
            .await
            .map_err(|e| AccessError::from_io(&path, e))?;

        Ok(decode_text_lossy(&buffer))
    }

    /// Last `line_count` lines of a file, line endings included.
    ///
    /// Missing, unreadable and empty files all come back as an empty vec.
    pub async fn tail_file(&self, filename: &str, line_count: usize) -> Vec<String> {
        if line_count == 0 {
            return Vec::new();
        }
        match self.read_file(filename).await {
            Ok(content) => tail_lines(&content, line_count),
            Err(e) => {
                tracing::debug!("Error tailing file {}: {}", filename, e);
                Vec::new()
            }
        }
    }
}

/// Number of lines as reported alongside full content: newlines + 1
pub fn line_total(content: &str) -> usize {
    content.split('\n').count()
}

pub fn tail_lines(content: &str, line_count: usize) -> Vec<String> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let skip = lines.len().saturating_sub(line_count);
    lines[skip..].iter().map(|line| line.to_string()).collect()
}

/// Decode file bytes as text without ever failing.
///
/// UTF-16 with a byte-order mark is decoded as UTF-16, anything else as
/// UTF-8. Invalid sequences are dropped, not replaced with U+FFFD.
pub fn decode_text_lossy(buffer: &[u8]) -> String {
    if let Some(rest) = buffer.strip_prefix(&[0xFF, 0xFE]) {
        let units = rest.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]]));
        return char::decode_utf16(units).filter_map(Result::ok).collect();
    }

    if let Some(rest) = buffer.strip_prefix(&[0xFE, 0xFF]) {
        let units = rest.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
        return char::decode_utf16(units).filter_map(Result::ok).collect();
    }

    let mut text = String::with_capacity(buffer.len());
    for chunk in buffer.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

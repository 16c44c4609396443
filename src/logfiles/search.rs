use crate::error::AccessError;
use crate::protocol::LineMatch;

use super::operations::LogOperations;

#[derive(Clone)]
pub struct LogSearch {
    ops: LogOperations,
}

impl LogSearch {
    pub fn new(ops: LogOperations) -> Self {
        Self { ops }
    }

    /// Case-insensitive substring search over the lines of one file
    pub async fn search_file(
        &self,
        filename: &str,
        query: &str,
    ) -> Result<Vec<LineMatch>, AccessError> {
        let content = self.ops.read_file(filename).await?;
        Ok(find_matches(&content, query))
    }
}

/// Lines are split on `\n` and numbered from 1, matching `line_total`.
pub fn find_matches(content: &str, query: &str) -> Vec<LineMatch> {
    let needle = query.to_lowercase();
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(i, line)| LineMatch {
            line_number: i + 1,
            content: line.to_string(),
        })
        .collect()
}

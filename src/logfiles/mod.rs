//! Read-only access to the files under the data directory

pub mod catalog;
pub mod config;
pub mod operations;
pub mod search;
pub mod security;


use std::sync::Arc;

use catalog::LogCatalog;
use config::LogFilesConfig;
use operations::LogOperations;
use search::LogSearch;
use security::PathValidator;

pub struct LogFileService {
    catalog: LogCatalog,
    ops: LogOperations,
    search: LogSearch,
}

impl LogFileService {
    pub fn new(config: LogFilesConfig) -> Self {
        let config = Arc::new(config);
        let validator = Arc::new(PathValidator::new(config.clone()));
        let catalog = LogCatalog::new(validator.clone(), config.clone());
        let ops = LogOperations::new(validator);
        let search = LogSearch::new(ops.clone());
        Self {
            catalog,
            ops,
            search,
        }
    }

    pub fn catalog(&self) -> &LogCatalog {
        &self.catalog
    }

    pub fn ops(&self) -> &LogOperations {
        &self.ops
    }

    pub fn search(&self) -> &LogSearch {
        &self.search
    }
}

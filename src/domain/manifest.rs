use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one command run, written next to its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub command: String,
    pub output: String,
    pub total_records: usize,
    pub entities_processed: usize,
    pub entities_empty: usize,
    pub entities_failed: usize,
    pub last_updated: String,
    pub version: String,
}

impl RunManifest {
    pub fn new(command: &str, output: &Path, total_records: usize) -> Self {
        Self {
            command: command.to_string(),
            output: output.display().to_string(),
            total_records,
            entities_processed: 0,
            entities_empty: 0,
            entities_failed: 0,
            last_updated: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

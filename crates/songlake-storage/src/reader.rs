//! Source dataset reader
//!
//! Recursively lists `.json` objects under a dataset prefix, parses one
//! record per line, and unions everything into a single vector. No
//! partial success: an unreadable file or a bad line aborts the load
//! for that dataset.

use crate::error::{EtlError, Result};
use opendal::{EntryMode, Operator};
use serde::de::DeserializeOwned;
use songlake_core::{LogRecord, SongRecord};
use songlake_config::{LOG_DATA_PREFIX, SONG_DATA_PREFIX};
use tracing::info;

/// Reads the two source datasets from an input operator.
pub struct SourceReader {
    operator: Operator,
}

impl SourceReader {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Load all song metadata records under `song-data/`.
    pub async fn load_songs(&self) -> Result<Vec<SongRecord>> {
        self.load_dataset(SONG_DATA_PREFIX).await
    }

    /// Load all event log records under `log-data/`.
    pub async fn load_logs(&self) -> Result<Vec<LogRecord>> {
        self.load_dataset(LOG_DATA_PREFIX).await
    }

    async fn load_dataset<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let entries = self
            .operator
            .list_with(prefix)
            .recursive(true)
            .await
            .map_err(|e| EtlError::read(prefix, e))?;

        let mut records = Vec::new();
        let mut file_count = 0usize;

        for entry in entries {
            if entry.metadata().mode() != EntryMode::FILE {
                continue;
            }
            if !entry.path().ends_with(".json") {
                continue;
            }
            file_count += 1;

            let buffer = self
                .operator
                .read(entry.path())
                .await
                .map_err(|e| EtlError::read(entry.path(), e))?;
            let content = String::from_utf8(buffer.to_vec())
                .map_err(|e| EtlError::read(entry.path(), e))?;

            for (line_number, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let record: T = serde_json::from_str(line).map_err(|e| {
                    EtlError::read(format!("{}:{}", entry.path(), line_number + 1), e)
                })?;
                records.push(record);
            }
        }

        if file_count == 0 {
            return Err(EtlError::read(prefix, "no .json files found"));
        }

        info!(
            prefix,
            files = file_count,
            records = records.len(),
            "Loaded source dataset"
        );
        Ok(records)
    }
}

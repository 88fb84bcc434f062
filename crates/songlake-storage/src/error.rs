//! Error types for the storage layer
//!
//! One variant per failure class: configuration, source read, output
//! write. Nothing here retries; every error aborts the run.

use thiserror::Error;

/// Errors raised by the reader and writer
#[derive(Debug, Error)]
pub enum EtlError {
    /// Storage configuration missing or inconsistent
    #[error("Invalid storage configuration: {message}")]
    Config { message: String },

    /// Source dataset unreachable, empty, or unparseable
    #[error("Read failed for '{path}': {reason}")]
    Read { path: String, reason: String },

    /// Output destination unwritable or encoding failed
    #[error("Write failed for '{path}': {reason}")]
    Write { path: String, reason: String },
}

impl EtlError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn read(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for EtlError
pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_carries_path_and_reason() {
        let err = EtlError::read("song-data/", "no files");
        assert_eq!(
            err.to_string(),
            "Read failed for 'song-data/': no files"
        );
    }
}

// songlake-config - configuration for the ETL job
//
// Supports configuration from multiple sources:
// 1. Environment variables (SONGLAKE_* prefix, plus raw AWS credentials)
// 2. Config file path from SONGLAKE_CONFIG env var
// 3. Default config file locations (./songlake.toml, ./.songlake.toml)
// 4. Filesystem defaults (lowest priority)
//
// The loaded struct is passed by reference to the reader and writer;
// nothing here is global.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod sources;
mod validation;

/// Sub-path under the input root holding song metadata files.
pub const SONG_DATA_PREFIX: &str = "song-data/";

/// Sub-path under the input root holding user event log files.
pub const LOG_DATA_PREFIX: &str = "log-data/";

/// Main ETL job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Object storage credentials, required when either endpoint is S3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    pub input: StorageLocation,

    pub output: StorageLocation,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Access key pair for S3-compatible storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// One storage endpoint: a backend plus a root (bucket or directory)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLocation {
    pub backend: StorageBackend,

    /// Bucket name for S3, directory path for the filesystem backend.
    pub root: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl StorageLocation {
    pub fn fs(root: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Fs,
            root: root.into(),
            region: None,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: fs, s3", s),
        }
    }
}

/// Logging configuration for the job binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl EtlConfig {
    /// Load configuration from all sources with priority, falling back to
    /// filesystem defaults when no config file exists.
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for CLI --config flag).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Filesystem defaults: ./data in, ./output-data out, no credentials.
    pub fn fs_defaults() -> Self {
        Self {
            credentials: None,
            input: StorageLocation::fs("./data"),
            output: StorageLocation::fs("./output-data"),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("fs".parse::<StorageBackend>().unwrap(), StorageBackend::Fs);
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "filesystem".parse::<StorageBackend>().unwrap(),
            StorageBackend::Fs
        );
        assert_eq!("aws".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("hdfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_fs_defaults_validate() {
        let config = EtlConfig::fs_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.root, "./data");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [credentials]
            access_key_id = "AKIAEXAMPLE"
            secret_access_key = "secret"

            [input]
            backend = "s3"
            root = "udacity-dend"
            region = "us-west-2"

            [output]
            backend = "fs"
            root = "./output-data"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: EtlConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.input.backend, StorageBackend::S3);
        assert_eq!(config.input.root, "udacity-dend");
        assert_eq!(config.output.backend, StorageBackend::Fs);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }
}

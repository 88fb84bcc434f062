// Configuration source loading.
//
// Priority order:
// 1. Environment variables (SONGLAKE_* prefix, raw AWS credential vars)
// 2. Config file path from SONGLAKE_CONFIG
// 3. Default config files (./songlake.toml, ./.songlake.toml)
// 4. Filesystem defaults

use crate::{Credentials, EtlConfig, StorageBackend};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

pub const ENV_PREFIX: &str = "SONGLAKE_";

/// Load configuration from default file locations with env overrides.
/// Falls back to filesystem defaults if no config file is found.
pub fn load_config() -> Result<EtlConfig> {
    let mut config = match load_from_file()? {
        Some(file_config) => file_config,
        None => EtlConfig::fs_defaults(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<EtlConfig>> {
    if let Ok(path) = env::var("SONGLAKE_CONFIG") {
        return read_config_file(&path).map(Some);
    }

    for path in &["./songlake.toml", "./.songlake.toml"] {
        if Path::new(path).exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns an error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<EtlConfig> {
    let path = path.as_ref();
    let mut config = read_config_file(path)?;

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: impl AsRef<Path>) -> Result<EtlConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply environment variable overrides on top of file/default config.
///
/// Recognized variables:
///   SONGLAKE_INPUT_ROOT, SONGLAKE_INPUT_BACKEND,
///   SONGLAKE_OUTPUT_ROOT, SONGLAKE_OUTPUT_BACKEND,
///   SONGLAKE_LOG_LEVEL,
///   AWS_ACCESS_KEY_ID + AWS_SECRET_ACCESS_KEY (raw, no prefix)
fn apply_env_overrides(config: &mut EtlConfig) -> Result<()> {
    if let Some(root) = get(env_key("INPUT_ROOT")) {
        config.input.root = root;
    }
    if let Some(backend) = get(env_key("INPUT_BACKEND")) {
        config.input.backend = backend.parse::<StorageBackend>()?;
    }
    if let Some(root) = get(env_key("OUTPUT_ROOT")) {
        config.output.root = root;
    }
    if let Some(backend) = get(env_key("OUTPUT_BACKEND")) {
        config.output.backend = backend.parse::<StorageBackend>()?;
    }
    if let Some(level) = get(env_key("LOG_LEVEL")) {
        config.logging.level = level;
    }

    // Standard AWS credential variables win over the config file so that
    // secrets can stay out of it entirely.
    if let (Some(access_key_id), Some(secret_access_key)) =
        (get("AWS_ACCESS_KEY_ID".into()), get("AWS_SECRET_ACCESS_KEY".into()))
    {
        config.credentials = Some(Credentials {
            access_key_id,
            secret_access_key,
        });
    }

    Ok(())
}

fn env_key(suffix: &str) -> String {
    format!("{}{}", ENV_PREFIX, suffix)
}

fn get(key: String) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

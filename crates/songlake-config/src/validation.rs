// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &EtlConfig) -> Result<()> {
    validate_location("input", &config.input)?;
    validate_location("output", &config.output)?;

    let needs_credentials = config.input.backend == StorageBackend::S3
        || config.output.backend == StorageBackend::S3;

    if needs_credentials {
        let credentials = config.credentials.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "S3 storage requires [credentials] with access_key_id and secret_access_key \
                (or AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY in the environment)"
            )
        })?;

        if credentials.access_key_id.is_empty() {
            bail!("credentials.access_key_id must not be empty");
        }
        if credentials.secret_access_key.is_empty() {
            bail!("credentials.secret_access_key must not be empty");
        }
    } else if config.credentials.is_some() {
        warn!("credentials configured but no S3 endpoint in use; ignoring");
    }

    if config.logging.level.is_empty() {
        bail!("logging.level must not be empty");
    }

    Ok(())
}

fn validate_location(name: &str, location: &StorageLocation) -> Result<()> {
    if location.root.is_empty() {
        bail!("{}.root must not be empty", name);
    }

    match location.backend {
        StorageBackend::Fs => {
            if location.region.is_some() || location.endpoint.is_some() {
                warn!(
                    location = name,
                    "region/endpoint are ignored for the fs backend"
                );
            }
        }
        StorageBackend::S3 => {
            let region = location
                .region
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("{}.region is required for the s3 backend", name))?;
            if region.is_empty() {
                bail!("{}.region must not be empty", name);
            }
        }
    }

    Ok(())
}

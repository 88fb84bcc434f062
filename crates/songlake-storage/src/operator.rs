//! Storage operator construction
//!
//! Builds an OpenDAL operator for one configured storage location. The
//! caller owns the operator and passes it to the reader or writer;
//! nothing is cached globally.

use crate::error::{EtlError, Result};
use songlake_config::{Credentials, StorageBackend, StorageLocation};

/// Build an operator for a storage location.
///
/// Credentials are required for the S3 backend and ignored for the
/// filesystem backend.
pub fn build_operator(
    location: &StorageLocation,
    credentials: Option<&Credentials>,
) -> Result<opendal::Operator> {
    match location.backend {
        StorageBackend::Fs => {
            let fs_builder = opendal::services::Fs::default().root(&location.root);
            Ok(opendal::Operator::new(fs_builder)
                .map_err(|e| {
                    EtlError::config(format!("Failed to create filesystem operator: {}", e))
                })?
                .finish())
        }
        StorageBackend::S3 => {
            let credentials = credentials.ok_or_else(|| {
                EtlError::config("S3 backend requires access_key_id and secret_access_key")
            })?;
            let region = location
                .region
                .as_deref()
                .ok_or_else(|| EtlError::config("S3 backend requires a region"))?;

            let mut s3_builder = opendal::services::S3::default()
                .bucket(&location.root)
                .region(region)
                .access_key_id(&credentials.access_key_id)
                .secret_access_key(&credentials.secret_access_key);

            if let Some(endpoint) = &location.endpoint {
                s3_builder = s3_builder.endpoint(endpoint);
            }

            Ok(opendal::Operator::new(s3_builder)
                .map_err(|e| EtlError::config(format!("Failed to create S3 operator: {}", e)))?
                .finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_operator_builds_without_credentials() {
        let location = StorageLocation::fs("/tmp/songlake-test");
        assert!(build_operator(&location, None).is_ok());
    }

    #[test]
    fn s3_operator_requires_credentials() {
        let location = StorageLocation {
            backend: StorageBackend::S3,
            root: "udacity-dend".to_string(),
            region: Some("us-west-2".to_string()),
            endpoint: None,
        };
        let err = build_operator(&location, None).unwrap_err();
        assert!(matches!(err, EtlError::Config { .. }));
    }

    #[test]
    fn s3_operator_builds_with_credentials() {
        let location = StorageLocation {
            backend: StorageBackend::S3,
            root: "udacity-dend".to_string(),
            region: Some("us-west-2".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
        };
        let credentials = Credentials {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
        };
        assert!(build_operator(&location, Some(&credentials)).is_ok());
    }
}

//! Service account credentials for the spreadsheet backend.
//!
//! Two sources are supported: the `gcp_service_account` secret, and a local
//! JSON key file for development. The secret wins when both are present.

use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::config::TrackerConfig;
use crate::error::TrackerError;

/// The fields of a Google service account key that token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// A source of service account credentials
pub trait CredentialProvider: Send + Sync {
    /// Short name of the source, for logs
    fn source(&self) -> &str;

    fn service_account(&self) -> Result<ServiceAccountKey, TrackerError>;
}

/// Credentials held in the secrets file or environment
pub struct SecretStoreCredentials {
    key: ServiceAccountKey,
}

impl SecretStoreCredentials {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self { key }
    }
}

impl CredentialProvider for SecretStoreCredentials {
    fn source(&self) -> &str {
        "secrets"
    }

    fn service_account(&self) -> Result<ServiceAccountKey, TrackerError> {
        Ok(self.key.clone())
    }
}

/// Credentials read from a service account JSON file
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileCredentials {
    fn source(&self) -> &str {
        "file"
    }

    fn service_account(&self) -> Result<ServiceAccountKey, TrackerError> {
        debug!("Reading service account from {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            TrackerError::Credentials(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            TrackerError::Credentials(format!("invalid key file {}: {}", self.path.display(), e))
        })
    }
}

/// Pick the credential source: the configured secret if present, otherwise
/// the local credentials file.
pub fn credential_provider(config: &TrackerConfig) -> Box<dyn CredentialProvider> {
    match &config.gcp_service_account {
        Some(key) => Box::new(SecretStoreCredentials::new(key.clone())),
        None => Box::new(FileCredentials::new(&config.sheets.credentials_file)),
    }
}

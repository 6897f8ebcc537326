//! API token storage

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PilotError;
use crate::filesys::file::File;

#[derive(Serialize, Deserialize)]
struct CredentialsFile {
    token: String,
}

/// The stored API token
#[derive(Clone)]
pub struct Credentials {
    pub token: SecretString,
}

impl Credentials {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Load the token; a missing file or empty token reads as `None`
    pub async fn load(file: &File) -> Result<Option<Self>, PilotError> {
        let stored: Option<CredentialsFile> = file.read_json().await?;
        Ok(stored
            .filter(|s| !s.token.trim().is_empty())
            .map(|s| Self::new(SecretString::from(s.token))))
    }

    /// Persist the token readable by the owner only
    pub async fn save(&self, file: &File) -> Result<(), PilotError> {
        let stored = CredentialsFile {
            token: self.token.expose_secret().to_string(),
        };
        file.write_json(&stored).await?;
        file.set_permissions_600().await?;
        debug!("Stored API token at {}", file.path().display());
        Ok(())
    }

    pub async fn clear(file: &File) -> Result<(), PilotError> {
        file.delete().await
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

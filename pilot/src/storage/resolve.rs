//! Resolve which server and token a command talks to

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::PilotError;
use crate::http::CoolifyClient;
use crate::storage::{Credentials, Settings, StorageLayout};

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// A fully resolved server URL and token
#[derive(Clone)]
pub struct Connection {
    pub server_url: String,
    pub token: SecretString,
}

impl Connection {
    pub fn client(&self) -> Result<CoolifyClient, PilotError> {
        CoolifyClient::new(&self.server_url, self.token.clone())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Overrides win over the stored files. Fails before any network call when
/// either the URL or the token is missing.
pub async fn resolve_connection(
    layout: &StorageLayout,
    overrides: &ConnectionOverrides,
) -> Result<Connection, PilotError> {
    let server_url = match non_blank(overrides.url.as_deref()) {
        Some(url) => Some(url),
        None => {
            let settings = Settings::load(&layout.settings_file()).await?;
            non_blank(settings.server_url.as_deref())
        }
    };

    let token = match non_blank(overrides.token.as_deref()) {
        Some(token) => Some(SecretString::from(token)),
        None => Credentials::load(&layout.credentials_file())
            .await?
            .map(|c| c.token)
            .filter(|t| !t.expose_secret().trim().is_empty()),
    };

    match (server_url, token) {
        (Some(server_url), Some(token)) => {
            debug!("Using Coolify server {}", server_url);
            Ok(Connection { server_url, token })
        }
        _ => Err(PilotError::not_configured()),
    }
}

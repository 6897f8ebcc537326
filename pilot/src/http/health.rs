//! Token and reachability probes
//!
//! Both probes swallow every failure and answer `false`; they never return
//! an error.

use reqwest::Method;
use serde::Deserialize;
use tracing::warn;

use crate::errors::PilotError;
use crate::http::client::{CoolifyClient, PROBE_TIMEOUT};

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionBody {
    Plain(String),
    Object {
        #[serde(default)]
        version: Option<String>,
    },
}

impl CoolifyClient {
    /// Check that the token is accepted by the server
    pub async fn verify_token(&self) -> bool {
        match self
            .request(Method::GET, "/api/v1/version", PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Token verification failed: {}", e);
                false
            }
        }
    }

    /// Check that the server answers its health endpoint, without credentials
    pub async fn test_reachability(&self) -> bool {
        match self.anonymous_request("/api/health", PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Server unreachable: {}", e);
                false
            }
        }
    }

    /// Server version string; the endpoint answers plain text or JSON
    pub async fn version(&self) -> Result<String, PilotError> {
        let text = self.get_text("/api/v1/version").await?;
        Ok(match serde_json::from_str::<VersionBody>(&text) {
            Ok(VersionBody::Plain(version)) => version,
            Ok(VersionBody::Object { version }) => {
                version.unwrap_or_else(|| "unknown".to_string())
            }
            Err(_) => text.trim().to_string(),
        })
    }
}

//! Auth deep links
//!
//! A Coolify page can hand over credentials through a link such as
//! `coolify-pilot://auth?token=sk-xxx&url=https%3A%2F%2Fcoolify.example.com`.
//! The `/auth` and `/callback` paths are accepted, either as the URL path or
//! as the authority of a bare scheme link.

use secrecy::SecretString;
use url::Url;

use crate::errors::PilotError;

const AUTH_PATHS: [&str; 2] = ["auth", "callback"];

/// Credentials carried by an auth deep link
#[derive(Clone)]
pub struct DeepLinkAuth {
    pub server_url: String,
    pub token: SecretString,
}

impl DeepLinkAuth {
    pub fn parse(link: &str) -> Result<Self, PilotError> {
        let url = Url::parse(link.trim())
            .map_err(|e| PilotError::ValidationError(format!("Invalid auth link: {}", e)))?;

        let path = url.path().trim_matches('/');
        let target = if path.is_empty() {
            url.host_str().unwrap_or_default()
        } else {
            path
        };
        if !AUTH_PATHS.contains(&target) {
            return Err(PilotError::ValidationError(format!(
                "Unsupported link path: {}",
                url.path()
            )));
        }

        let mut token = None;
        let mut server_url = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.trim().to_string()),
                "url" => server_url = Some(value.trim().trim_end_matches('/').to_string()),
                _ => {}
            }
        }

        match (token, server_url) {
            (Some(token), Some(server_url)) if !token.is_empty() && !server_url.is_empty() => {
                Ok(Self {
                    server_url,
                    token: SecretString::from(token),
                })
            }
            _ => Err(PilotError::ValidationError(
                "Invalid auth link: missing token or server URL.".to_string(),
            )),
        }
    }

    /// Server address without the scheme, for messages
    pub fn display_host(&self) -> &str {
        self.server_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
    }
}

impl std::fmt::Debug for DeepLinkAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLinkAuth")
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

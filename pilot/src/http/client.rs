//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::PilotError;

/// Timeout for data and control calls
pub const DATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for token and health probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Authenticated client for the Coolify REST API
///
/// Holds nothing but the base URL and the token, so it is cheap to clone and
/// safe to share between concurrent pipeline runs.
#[derive(Clone)]
pub struct CoolifyClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl CoolifyClient {
    /// Create a new client for `base_url` authenticating with `token`
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, PilotError> {
        let client = Client::builder()
            .user_agent(concat!("coolify-pilot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an authenticated request with its own timeout.
    ///
    /// The timeout is attached to the request itself, so it aborts the
    /// in-flight call and goes away with the request on every exit path.
    pub(crate) fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);

        self.client
            .request(method, url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .timeout(timeout)
    }

    /// Build a request without credentials
    pub(crate) fn anonymous_request(&self, path: &str, timeout: Duration) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {} (unauthenticated)", url);
        self.client.get(url).timeout(timeout)
    }

    fn check(response: Response, method: &Method, path: &str) -> Result<Response, PilotError> {
        let status = response.status();
        if !status.is_success() {
            error!("HTTP {} {} failed: {}", method, path, status);
            return Err(PilotError::request_failed(status));
        }
        Ok(response)
    }

    /// Make a request and parse the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, PilotError> {
        let response = self
            .request(method.clone(), path, DATA_TIMEOUT)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = Self::check(response, &method, path)?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Make a GET request and parse the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PilotError> {
        self.send_json(Method::GET, path).await
    }

    /// Make a GET request and return the body as text
    pub async fn get_text(&self, path: &str) -> Result<String, PilotError> {
        let response = self.request(Method::GET, path, DATA_TIMEOUT).send().await?;
        let response = Self::check(response, &Method::GET, path)?;
        Ok(response.text().await?)
    }

    /// Make a state-changing request whose body is ignored
    pub async fn trigger(&self, method: Method, path: &str) -> Result<bool, PilotError> {
        let response = self.request(method.clone(), path, DATA_TIMEOUT).send().await?;
        Self::check(response, &method, path)?;
        Ok(true)
    }
}

impl std::fmt::Debug for CoolifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoolifyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

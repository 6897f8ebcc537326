//! Deployment API client

use reqwest::Method;
use tracing::warn;

use crate::errors::PilotError;
use crate::http::client::CoolifyClient;
use crate::models::deployment::{Deployment, TriggerResponse};

impl CoolifyClient {
    /// List deployments currently known to the server
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>, PilotError> {
        self.get("/api/v1/deployments").await
    }

    /// Get a single deployment, including its build log
    pub async fn get_deployment(&self, uuid: &str) -> Result<Deployment, PilotError> {
        self.get(&format!("/api/v1/deployments/{}", uuid)).await
    }

    /// Trigger a deployment of an application.
    ///
    /// Returns `Ok(None)` when the server accepted the request but did not
    /// return a deployment identifier; the deployment is running but cannot
    /// be tracked.
    pub async fn trigger_deployment(&self, uuid: &str) -> Result<Option<String>, PilotError> {
        let encoded: String = url::form_urlencoded::byte_serialize(uuid.as_bytes()).collect();
        let response: TriggerResponse = self.get(&format!("/api/v1/deploy?uuid={}", encoded)).await?;
        let id = response.deployment_id();
        if id.is_none() {
            warn!("Deploy trigger for {} returned no deployment id", uuid);
        }
        Ok(id)
    }

    /// Cancel a queued or running deployment
    pub async fn cancel_deployment(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::POST, &format!("/api/v1/deployments/{}/cancel", uuid))
            .await
    }
}

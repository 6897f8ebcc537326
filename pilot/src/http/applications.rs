//! Application endpoints

use reqwest::Method;

use crate::errors::PilotError;
use crate::http::client::CoolifyClient;
use crate::models::application::Application;

impl CoolifyClient {
    /// List all applications
    pub async fn list_applications(&self) -> Result<Vec<Application>, PilotError> {
        self.get("/api/v1/applications").await
    }

    /// Get a single application
    pub async fn get_application(&self, uuid: &str) -> Result<Application, PilotError> {
        self.get(&format!("/api/v1/applications/{}", uuid)).await
    }

    /// Fetch the application's container logs as plain text
    pub async fn fetch_application_logs(&self, uuid: &str) -> Result<String, PilotError> {
        self.get_text(&format!("/api/v1/applications/{}/logs", uuid))
            .await
    }

    pub async fn start_application(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::GET, &format!("/api/v1/applications/{}/start", uuid))
            .await
    }

    pub async fn stop_application(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::GET, &format!("/api/v1/applications/{}/stop", uuid))
            .await
    }

    pub async fn restart_application(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::GET, &format!("/api/v1/applications/{}/restart", uuid))
            .await
    }
}

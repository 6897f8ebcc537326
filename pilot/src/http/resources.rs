//! Server, database and project endpoints

use reqwest::Method;

use crate::errors::PilotError;
use crate::http::client::CoolifyClient;
use crate::models::resource::{Database, Project, Server};

impl CoolifyClient {
    pub async fn list_servers(&self) -> Result<Vec<Server>, PilotError> {
        self.get("/api/v1/servers").await
    }

    pub async fn list_databases(&self) -> Result<Vec<Database>, PilotError> {
        self.get("/api/v1/databases").await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, PilotError> {
        self.get("/api/v1/projects").await
    }

    pub async fn start_database(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::GET, &format!("/api/v1/databases/{}/start", uuid))
            .await
    }

    pub async fn stop_database(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::GET, &format!("/api/v1/databases/{}/stop", uuid))
            .await
    }

    /// Request an on-demand backup of a database
    pub async fn backup_database(&self, uuid: &str) -> Result<bool, PilotError> {
        self.trigger(Method::POST, &format!("/api/v1/databases/{}/backup", uuid))
            .await
    }
}

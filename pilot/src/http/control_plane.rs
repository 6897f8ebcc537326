//! The slices of the API the pipeline and the snapshot depend on

use async_trait::async_trait;

use crate::errors::PilotError;
use crate::http::client::CoolifyClient;
use crate::models::application::Application;
use crate::models::deployment::Deployment;
use crate::models::resource::{Database, Project, Server};

/// Control-plane operations used by the deploy pipeline, as a trait for testability
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn get_application(&self, uuid: &str) -> Result<Application, PilotError>;

    /// Returns the deployment id, or `None` when the deploy is untrackable
    async fn trigger_deployment(&self, uuid: &str) -> Result<Option<String>, PilotError>;

    async fn get_deployment(&self, uuid: &str) -> Result<Deployment, PilotError>;

    async fn fetch_application_logs(&self, uuid: &str) -> Result<String, PilotError>;
}

#[async_trait]
impl ControlPlane for CoolifyClient {
    async fn get_application(&self, uuid: &str) -> Result<Application, PilotError> {
        CoolifyClient::get_application(self, uuid).await
    }

    async fn trigger_deployment(&self, uuid: &str) -> Result<Option<String>, PilotError> {
        CoolifyClient::trigger_deployment(self, uuid).await
    }

    async fn get_deployment(&self, uuid: &str) -> Result<Deployment, PilotError> {
        CoolifyClient::get_deployment(self, uuid).await
    }

    async fn fetch_application_logs(&self, uuid: &str) -> Result<String, PilotError> {
        CoolifyClient::fetch_application_logs(self, uuid).await
    }
}

/// List endpoints feeding the resource snapshot
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn list_applications(&self) -> Result<Vec<Application>, PilotError>;
    async fn list_servers(&self) -> Result<Vec<Server>, PilotError>;
    async fn list_databases(&self) -> Result<Vec<Database>, PilotError>;
    async fn list_projects(&self) -> Result<Vec<Project>, PilotError>;
}

#[async_trait]
impl ResourceSource for CoolifyClient {
    async fn list_applications(&self) -> Result<Vec<Application>, PilotError> {
        CoolifyClient::list_applications(self).await
    }

    async fn list_servers(&self) -> Result<Vec<Server>, PilotError> {
        CoolifyClient::list_servers(self).await
    }

    async fn list_databases(&self) -> Result<Vec<Database>, PilotError> {
        CoolifyClient::list_databases(self).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, PilotError> {
        CoolifyClient::list_projects(self).await
    }
}

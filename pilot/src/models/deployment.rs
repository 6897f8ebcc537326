//! Deployment models

use serde::{Deserialize, Serialize};

use crate::models::status::DeploymentStatus;

/// One execution of building and releasing an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment UUID
    #[serde(rename = "deployment_uuid", default)]
    pub uuid: String,

    /// Numeric database ID, used when no UUID is present
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(default)]
    pub application_id: Option<serde_json::Value>,

    #[serde(default)]
    pub application_name: Option<String>,

    /// Raw status as reported by the server
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub commit: Option<String>,

    #[serde(default)]
    pub commit_message: Option<String>,

    /// Build log; only a JSON string is treated as log text
    #[serde(default)]
    pub logs: Option<serde_json::Value>,
}

impl Deployment {
    pub fn status(&self) -> DeploymentStatus {
        DeploymentStatus::normalize(&self.status)
    }

    /// Identifier usable with the deployment endpoints
    pub fn key(&self) -> String {
        if !self.uuid.is_empty() {
            return self.uuid.clone();
        }
        match &self.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Build log text, when the server sent it as a string
    pub fn log_text(&self) -> Option<&str> {
        match &self.logs {
            Some(serde_json::Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Response of the deploy trigger endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub deploy_uuid: Option<String>,

    #[serde(default)]
    pub deployments: Vec<TriggeredDeployment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggeredDeployment {
    #[serde(default)]
    pub deployment_uuid: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl TriggerResponse {
    /// The deployment identifier, if the server returned one
    pub fn deployment_id(&self) -> Option<String> {
        self.deploy_uuid
            .iter()
            .chain(self.deployments.iter().filter_map(|d| d.deployment_uuid.as_ref()))
            .find(|id| !id.is_empty())
            .cloned()
    }
}

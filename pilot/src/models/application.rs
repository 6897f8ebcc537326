//! Application models

use serde::{Deserialize, Serialize};

use crate::models::status::AppStatus;

/// A deployable application tracked by Coolify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Application {
    /// Application UUID
    #[serde(default)]
    pub uuid: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Raw lifecycle status as reported by the server
    #[serde(default)]
    pub status: String,

    /// Public hostname(s), comma separated
    #[serde(default)]
    pub fqdn: Option<String>,

    /// Git repository the application is built from
    #[serde(default)]
    pub git_repository: Option<String>,

    /// Branch the platform deploys from
    #[serde(default)]
    pub git_branch: Option<String>,

    /// Last commit the platform knows about
    #[serde(default)]
    pub git_commit_sha: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Application {
    /// Normalized lifecycle status
    pub fn status(&self) -> AppStatus {
        AppStatus::normalize(&self.status)
    }

    /// The configured deploy branch, ignoring empty values
    pub fn deploy_branch(&self) -> Option<&str> {
        self.git_branch.as_deref().filter(|b| !b.is_empty())
    }

    /// The last-deployed commit hash, ignoring empty values
    pub fn commit_sha(&self) -> Option<&str> {
        self.git_commit_sha.as_deref().filter(|s| !s.is_empty())
    }

    /// First public URL, with a scheme
    pub fn public_url(&self) -> Option<String> {
        let first = self.fqdn.as_deref()?.split(',').next()?.trim();
        if first.is_empty() {
            return None;
        }
        if first.starts_with("http://") || first.starts_with("https://") {
            Some(first.to_string())
        } else {
            Some(format!("https://{}", first))
        }
    }
}

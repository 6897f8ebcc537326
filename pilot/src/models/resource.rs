//! Servers, databases, projects and the `Resource` sum type

use serde::{Deserialize, Serialize};

use crate::models::application::Application;
use crate::models::status::AppStatus;

/// A server managed by Coolify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub settings: Option<ServerSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub is_reachable: Option<bool>,

    #[serde(default)]
    pub is_usable: Option<bool>,
}

impl Server {
    /// Reachability as last reported; unknown counts as unreachable
    pub fn is_reachable(&self) -> bool {
        self.settings
            .as_ref()
            .and_then(|s| s.is_reachable)
            .unwrap_or(false)
    }
}

/// A database managed by Coolify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    /// Engine, e.g. `standalone-postgresql`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Database {
    pub fn status(&self) -> AppStatus {
        AppStatus::normalize(self.status.as_deref().unwrap_or_default())
    }
}

/// A project grouping environments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// An environment inside a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub uuid: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub applications: Vec<Application>,
}

/// Actions a user can take on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Deploy,
    Start,
    Stop,
    Restart,
    ViewLogs,
    Backup,
}

impl ResourceAction {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceAction::Deploy => "deploy",
            ResourceAction::Start => "start",
            ResourceAction::Stop => "stop",
            ResourceAction::Restart => "restart",
            ResourceAction::ViewLogs => "logs",
            ResourceAction::Backup => "backup",
        }
    }
}

/// Anything shown in the resource listing
#[derive(Debug, Clone)]
pub enum Resource {
    Application(Application),
    Database(Database),
    Server(Server),
    Project(Project),
    Environment(Environment),
    Category { label: String, count: usize },
}

impl Resource {
    pub fn label(&self) -> String {
        match self {
            Resource::Application(app) => app.name.clone(),
            Resource::Database(db) => db.name.clone(),
            Resource::Server(server) => format!("{} ({})", server.name, server.ip),
            Resource::Project(project) => project.name.clone(),
            Resource::Environment(env) => env.name.clone(),
            Resource::Category { label, count } => format!("{} ({})", label, count),
        }
    }

    /// Short status marker for listings
    pub fn marker(&self) -> &'static str {
        match self {
            Resource::Application(app) => status_marker(app.status()),
            Resource::Database(db) => status_marker(db.status()),
            Resource::Server(server) if server.is_reachable() => "●",
            Resource::Server(_) => "○",
            Resource::Project(_) | Resource::Environment(_) | Resource::Category { .. } => "▸",
        }
    }

    /// Actions available for the resource in its current state
    pub fn actions(&self) -> Vec<ResourceAction> {
        match self {
            Resource::Application(app) => {
                let mut actions = vec![ResourceAction::Deploy, ResourceAction::ViewLogs];
                match app.status() {
                    AppStatus::Running => {
                        actions.extend([ResourceAction::Stop, ResourceAction::Restart])
                    }
                    AppStatus::Deploying | AppStatus::Starting => {
                        actions.push(ResourceAction::Stop)
                    }
                    AppStatus::Stopped
                    | AppStatus::Exited
                    | AppStatus::Error
                    | AppStatus::Failed
                    | AppStatus::Unknown => actions.push(ResourceAction::Start),
                }
                actions
            }
            Resource::Database(db) => {
                let mut actions = vec![ResourceAction::Backup];
                if db.status().is_up() {
                    actions.push(ResourceAction::Stop);
                } else {
                    actions.push(ResourceAction::Start);
                }
                actions
            }
            Resource::Server(_)
            | Resource::Project(_)
            | Resource::Environment(_)
            | Resource::Category { .. } => Vec::new(),
        }
    }
}

fn status_marker(status: AppStatus) -> &'static str {
    match status {
        AppStatus::Running => "●",
        AppStatus::Deploying | AppStatus::Starting => "◐",
        AppStatus::Stopped | AppStatus::Exited => "○",
        AppStatus::Error | AppStatus::Failed => "✗",
        AppStatus::Unknown => "?",
    }
}

//! Last-known view of every resource on the server

use chrono::{DateTime, Local};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::PilotError;
use crate::http::ResourceSource;
use crate::models::application::Application;
use crate::models::resource::{Database, Project, Resource, Server};

/// Everything fetched by the last refresh
#[derive(Debug, Clone, Default)]
pub struct SnapshotData {
    pub applications: Vec<Application>,
    pub servers: Vec<Server>,
    pub databases: Vec<Database>,
    pub projects: Vec<Project>,
    pub refreshed_at: Option<DateTime<Local>>,
}

/// Which list endpoints failed during a refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub failed: Vec<&'static str>,
}

impl RefreshSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Shared resource snapshot
#[derive(Debug, Default)]
pub struct ResourceSnapshot {
    data: RwLock<SnapshotData>,
}

fn keep_on_error<T>(
    slot: &mut Vec<T>,
    result: Result<Vec<T>, PilotError>,
    endpoint: &'static str,
    summary: &mut RefreshSummary,
) {
    match result {
        Ok(items) => *slot = items,
        Err(e) => {
            warn!("Failed to refresh {}, keeping previous list: {}", endpoint, e);
            summary.failed.push(endpoint);
        }
    }
}

impl ResourceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all lists at once. An endpoint that fails keeps its previous list.
    pub async fn refresh(&self, source: &dyn ResourceSource) -> RefreshSummary {
        let (applications, servers, databases, projects) = tokio::join!(
            source.list_applications(),
            source.list_servers(),
            source.list_databases(),
            source.list_projects(),
        );

        let mut summary = RefreshSummary::default();
        let mut data = self.data.write().await;
        keep_on_error(&mut data.applications, applications, "applications", &mut summary);
        keep_on_error(&mut data.servers, servers, "servers", &mut summary);
        keep_on_error(&mut data.databases, databases, "databases", &mut summary);
        keep_on_error(&mut data.projects, projects, "projects", &mut summary);
        data.refreshed_at = Some(Local::now());

        debug!(
            "Snapshot refreshed: {} applications, {} servers, {} databases, {} projects",
            data.applications.len(),
            data.servers.len(),
            data.databases.len(),
            data.projects.len()
        );
        summary
    }

    pub async fn data(&self) -> SnapshotData {
        self.data.read().await.clone()
    }

    /// Current data without waiting; `None` while a refresh holds the lock
    pub fn try_data(&self) -> Option<SnapshotData> {
        self.data.try_read().ok().map(|data| data.clone())
    }
}

fn push_line(out: &mut String, depth: usize, resource: &Resource) {
    let actions: Vec<&str> = resource.actions().iter().map(|a| a.label()).collect();
    out.push_str(&"  ".repeat(depth));
    out.push_str(resource.marker());
    out.push(' ');
    out.push_str(&resource.label());
    match resource {
        Resource::Application(app) => {
            out.push_str(&format!("  [{}] {}", app.status(), app.uuid));
        }
        Resource::Database(db) => {
            out.push_str(&format!("  [{}] {}", db.status(), db.uuid));
        }
        _ => {}
    }
    if !actions.is_empty() {
        out.push_str(&format!("  ({})", actions.join(", ")));
    }
    out.push('\n');
}

/// Render the snapshot as an indented resource tree
pub fn render_tree(data: &SnapshotData) -> String {
    let mut out = String::new();

    push_line(
        &mut out,
        0,
        &Resource::Category {
            label: "Applications".to_string(),
            count: data.applications.len(),
        },
    );
    for app in &data.applications {
        push_line(&mut out, 1, &Resource::Application(app.clone()));
    }

    push_line(
        &mut out,
        0,
        &Resource::Category {
            label: "Databases".to_string(),
            count: data.databases.len(),
        },
    );
    for db in &data.databases {
        push_line(&mut out, 1, &Resource::Database(db.clone()));
    }

    push_line(
        &mut out,
        0,
        &Resource::Category {
            label: "Servers".to_string(),
            count: data.servers.len(),
        },
    );
    for server in &data.servers {
        push_line(&mut out, 1, &Resource::Server(server.clone()));
    }

    push_line(
        &mut out,
        0,
        &Resource::Category {
            label: "Projects".to_string(),
            count: data.projects.len(),
        },
    );
    for project in &data.projects {
        push_line(&mut out, 1, &Resource::Project(project.clone()));
        for env in &project.environments {
            push_line(&mut out, 2, &Resource::Environment(env.clone()));
        }
    }

    out
}

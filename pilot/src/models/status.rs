//! Status normalization for applications and deployments
//!
//! Coolify reports statuses as free-form strings (`running:healthy`,
//! `exited:unhealthy`, `in_progress`, ...). Everything that needs to reason
//! about a status goes through the two enums here instead of matching on
//! substrings.

use std::fmt;

/// Normalized application lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppStatus {
    Running,
    Stopped,
    Exited,
    Deploying,
    Starting,
    Error,
    Failed,
    Unknown,
}

impl AppStatus {
    /// Map a server-reported status string onto a known status.
    ///
    /// Only the segment before the first `:` is significant, so
    /// `running:healthy` and `running:unknown` are both `Running`.
    pub fn normalize(raw: &str) -> Self {
        let head = raw.split(':').next().unwrap_or_default().trim().to_ascii_lowercase();
        match head.as_str() {
            "running" | "healthy" => AppStatus::Running,
            "stopped" => AppStatus::Stopped,
            "exited" => AppStatus::Exited,
            "deploying" | "building" => AppStatus::Deploying,
            "starting" | "restarting" => AppStatus::Starting,
            "error" | "degraded" => AppStatus::Error,
            "failed" => AppStatus::Failed,
            _ => AppStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppStatus::Running => "running",
            AppStatus::Stopped => "stopped",
            AppStatus::Exited => "exited",
            AppStatus::Deploying => "deploying",
            AppStatus::Starting => "starting",
            AppStatus::Error => "error",
            AppStatus::Failed => "failed",
            AppStatus::Unknown => "unknown",
        }
    }

    /// Whether the application is up and serving
    pub fn is_up(&self) -> bool {
        matches!(self, AppStatus::Running)
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized deployment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentStatus {
    Queued,
    InProgress,
    Finished,
    Failed,
    Error,
    Other,
}

impl DeploymentStatus {
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" => DeploymentStatus::Queued,
            "in_progress" => DeploymentStatus::InProgress,
            "finished" => DeploymentStatus::Finished,
            "failed" => DeploymentStatus::Failed,
            "error" => DeploymentStatus::Error,
            _ => DeploymentStatus::Other,
        }
    }

    /// Terminal statuses end build-log polling
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Finished | DeploymentStatus::Failed | DeploymentStatus::Error
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentStatus::Finished)
    }

    /// Only queued and running deployments can be cancelled
    pub fn is_cancellable(&self) -> bool {
        matches!(self, DeploymentStatus::Queued | DeploymentStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Queued => "queued",
            DeploymentStatus::InProgress => "in_progress",
            DeploymentStatus::Finished => "finished",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Error => "error",
            DeploymentStatus::Other => "other",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

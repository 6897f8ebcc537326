//! Settings file management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::PilotError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// User settings, stored as `settings.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the Coolify instance
    #[serde(default)]
    pub server_url: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Resource snapshot refresh interval in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Show success notices for resource actions
    #[serde(default = "default_true")]
    pub enable_notifications: bool,

    /// Deploy pipeline polling interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    5000
}

fn default_poll_interval() -> u64 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            log_level: LogLevel::default(),
            refresh_interval_ms: default_refresh_interval(),
            enable_notifications: true,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(500))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Load settings, falling back to defaults when the file is absent
    pub async fn load(file: &File) -> Result<Self, PilotError> {
        Ok(file.read_json().await?.unwrap_or_default())
    }

    pub async fn save(&self, file: &File) -> Result<(), PilotError> {
        file.write_json(self).await
    }
}

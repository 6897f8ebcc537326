//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logs::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "coolify-pilot", version)]
#[command(about = "Observe and drive deployments on a self-hosted Coolify instance", long_about = None)]
pub struct Cli {
    /// Coolify server URL, overriding the stored one
    #[arg(long, global = true, env = "COOLIFY_URL")]
    pub url: Option<String>,

    /// API token, overriding the stored one
    #[arg(long, global = true, env = "COOLIFY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Diagnostic log level written to stderr (RUST_LOG wins when set)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Also write diagnostics to a daily log file
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate and store the server URL and API token given with --url and --token
    Configure,

    /// Store credentials from an auth deep link
    Login {
        /// Link of the form <scheme>://auth?token=...&url=...
        #[arg(long)]
        link: String,
    },

    /// Forget the stored server URL and token
    Logout,

    /// Check server reachability, token and version
    Status,

    /// Refresh and print the resource tree until Ctrl-C
    Watch,

    /// List applications
    Apps,

    /// Application actions
    App {
        #[command(subcommand)]
        command: AppCommands,
    },

    /// Database actions
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// List deployments
    Deployments {
        /// Only queued and in-progress deployments
        #[arg(long)]
        active: bool,
    },

    /// Run the deploy pipeline for an application
    Deploy {
        /// Application UUID
        uuid: String,

        /// Display name, looked up when omitted
        #[arg(long)]
        name: Option<String>,

        /// Working copy to check and push (defaults to the current directory)
        #[arg(long, conflicts_with = "no_workspace")]
        workspace: Option<PathBuf>,

        /// Deploy without touching any local working copy
        #[arg(long)]
        no_workspace: bool,

        /// Answer every confirmation with "proceed"
        #[arg(short, long)]
        yes: bool,
    },

    /// Trigger a deployment and return without following it
    QuickDeploy {
        /// Application UUID
        uuid: String,

        /// Display name, looked up when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Open an application's public URL in the browser
    Open {
        /// Application UUID
        uuid: String,

        /// Only print the URL
        #[arg(long)]
        print: bool,
    },

    /// Cancel a queued or in-progress deployment
    Cancel {
        /// Deployment UUID
        uuid: String,
    },

    /// Show application logs
    Logs {
        /// Application UUID
        uuid: String,

        /// Keep tailing new output until Ctrl-C
        #[arg(short, long)]
        follow: bool,
    },

    /// Suggest a deploy for the application tracking the current branch
    Advise {
        /// Working copy to inspect (defaults to the current directory)
        #[arg(long)]
        workspace: Option<PathBuf>,

        #[arg(short, long)]
        yes: bool,
    },

    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Start,
    Stop,
    Restart,
}

/// Application subcommands
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Start an application
    Start { uuid: String },
    /// Stop an application
    Stop { uuid: String },
    /// Restart an application
    Restart { uuid: String },
}

impl AppCommands {
    pub fn split(self) -> (AppAction, String) {
        match self {
            AppCommands::Start { uuid } => (AppAction::Start, uuid),
            AppCommands::Stop { uuid } => (AppAction::Stop, uuid),
            AppCommands::Restart { uuid } => (AppAction::Restart, uuid),
        }
    }
}

/// Database subcommands
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Start a database
    Start { uuid: String },
    /// Stop a database
    Stop { uuid: String },
    /// Trigger a backup
    Backup { uuid: String },
}

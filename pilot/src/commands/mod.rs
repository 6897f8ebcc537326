//! Command handlers
//!
//! Each handler resolves its connection lazily, so commands that need no
//! server (`version`, `logout`) work without configuration.

mod apps;
mod config;
mod databases;
mod deploy;
mod deployments;
mod status;

use std::future::Future;

use anyhow::{Context as _, Result};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cli::Commands;
use crate::deploy::CancelFlag;
use crate::http::CoolifyClient;
use crate::prompt::{Notice, Prompter, TerminalPrompter};
use crate::storage::{resolve_connection, ConnectionOverrides, Settings, StorageLayout};

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone)]
pub struct Context {
    pub layout: StorageLayout,
    pub settings: Settings,
    pub overrides: ConnectionOverrides,
}

impl Context {
    pub fn new(layout: StorageLayout, settings: Settings, overrides: ConnectionOverrides) -> Self {
        Self {
            layout,
            settings,
            overrides,
        }
    }

    /// Client for the resolved server; fails before any request when unconfigured
    pub async fn client(&self) -> Result<CoolifyClient> {
        let connection = resolve_connection(&self.layout, &self.overrides).await?;
        Ok(connection.client()?)
    }

    /// Show a success notice unless notifications are turned off
    pub fn success(&self, message: impl Into<String>) {
        if self.settings.enable_notifications {
            TerminalPrompter::default().notify(Notice::Info(message.into()));
        }
    }
}

/// Application name for messages, falling back to the UUID
async fn application_name(client: &CoolifyClient, uuid: &str) -> String {
    match client.get_application(uuid).await {
        Ok(app) if !app.name.is_empty() => app.name,
        Ok(_) => uuid.to_string(),
        Err(e) => {
            warn!("Could not look up application {}: {}", uuid, e);
            uuid.to_string()
        }
    }
}

/// Route a parsed command to its handler
pub async fn handle_command(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Configure => config::configure(ctx).await,
        Commands::Login { link } => config::login(ctx, &link).await,
        Commands::Logout => config::logout(ctx).await,
        Commands::Status => status::status(ctx).await,
        Commands::Watch => status::watch(ctx).await,
        Commands::Apps => apps::list(ctx).await,
        Commands::App { command } => {
            let (action, uuid) = command.split();
            apps::act(ctx, action, &uuid).await
        }
        Commands::Db { command } => databases::act(ctx, command).await,
        Commands::Deployments { active } => deployments::list(ctx, active).await,
        Commands::Deploy {
            uuid,
            name,
            workspace,
            no_workspace,
            yes,
        } => {
            let request = deploy::DeployRequest {
                uuid,
                name,
                workspace,
                no_workspace,
                yes,
            };
            deploy::deploy(ctx, request).await
        }
        Commands::QuickDeploy { uuid, name } => deploy::quick_deploy(ctx, &uuid, name).await,
        Commands::Open { uuid, print } => apps::open(ctx, &uuid, print).await,
        Commands::Cancel { uuid } => deployments::cancel(ctx, &uuid).await,
        Commands::Logs { uuid, follow } => apps::logs(ctx, &uuid, follow).await,
        Commands::Advise { workspace, yes } => deploy::advise(ctx, workspace, yes).await,
        Commands::Version => print_version(),
    }
}

fn print_version() -> Result<()> {
    let version = crate::utils::version_info();
    println!(
        "{}",
        serde_json::to_string_pretty(&version).context("Failed to render version info")?
    );
    Ok(())
}

/// Resolve when the user asks to stop (Ctrl-C, or SIGTERM on unix)
pub async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("SIGTERM received, stopping..."),
                    _ = tokio::signal::ctrl_c() => info!("Ctrl+C received, stopping..."),
                }
                return;
            }
            Err(e) => warn!("Unable to listen for SIGTERM: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received, stopping...");
}

/// Set `flag` on the first shutdown signal and exit on the second
pub fn cancel_on_signal(flag: CancelFlag) -> JoinHandle<()> {
    tokio::spawn(cancel_then_exit(flag, await_shutdown_signal, || {
        std::process::exit(130);
    }))
}

async fn cancel_then_exit<S, F>(flag: CancelFlag, mut signal: S, exit: impl FnOnce())
where
    S: FnMut() -> F,
    F: Future<Output = ()>,
{
    signal().await;
    flag.cancel();
    eprintln!("Stopping... press Ctrl-C again to quit immediately.");

    // second signal: stop waiting for in-flight requests
    signal().await;
    warn!("Second interrupt received, exiting");
    exit();
}

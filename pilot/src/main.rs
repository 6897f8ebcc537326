//! coolify-pilot - Entry Point
//!
//! Terminal companion for a self-hosted Coolify instance: lists resources,
//! runs resource actions and drives the push-verify-deploy-tail pipeline.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use coolify_pilot::cli::Cli;
use coolify_pilot::commands::{handle_command, Context};
use coolify_pilot::errors::AlreadyReported;
use coolify_pilot::logs::{init_logging, LogOptions};
use coolify_pilot::storage::{ConnectionOverrides, Settings, StorageLayout};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let layout = StorageLayout::default();
    let settings = match Settings::load(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} unable to read settings, using defaults: {}", "warning:".yellow(), e);
            Settings::default()
        }
    };

    let log_options = LogOptions {
        log_level: cli.log_level.unwrap_or(settings.log_level),
        log_dir: cli.log_file.then(|| layout.logs_dir()),
        ..Default::default()
    };
    // held until exit so the file writer flushes
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };
    debug!("Storage at {}", layout.base_dir.display());

    let overrides = ConnectionOverrides {
        url: cli.url,
        token: cli.token,
    };
    let ctx = Context::new(layout, settings, overrides);

    match handle_command(cli.command, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<AlreadyReported>().is_some() => {
            debug!("Exiting after reported failure: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

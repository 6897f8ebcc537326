//! Application listing, actions, logs and browser links

use std::process::Stdio;

use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use tracing::warn;

use super::{application_name, cancel_on_signal, Context};
use crate::cli::AppAction;
use crate::deploy::{CancelFlag, LogTail};
use crate::models::resource::Resource;
use crate::sink::{LogSink, StdoutSink};

pub async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.client().await?;
    let apps = client
        .list_applications()
        .await
        .context("Failed to list applications")?;

    if apps.is_empty() {
        println!("{}", "No applications found.".yellow());
        return Ok(());
    }

    for app in &apps {
        println!(
            "{} {:<28} {:<10} {}  {}  {}",
            Resource::Application(app.clone()).marker(),
            app.name.bold(),
            app.status().to_string(),
            app.uuid.dimmed(),
            app.deploy_branch().unwrap_or("-"),
            app.public_url().unwrap_or_default()
        );
    }
    Ok(())
}

pub async fn act(ctx: &Context, action: AppAction, uuid: &str) -> Result<()> {
    let client = ctx.client().await?;
    let name = application_name(&client, uuid).await;

    let (verb, done, result) = match action {
        AppAction::Start => ("start", "started", client.start_application(uuid).await),
        AppAction::Stop => ("stop", "stopped", client.stop_application(uuid).await),
        AppAction::Restart => ("restart", "restarted", client.restart_application(uuid).await),
    };
    result.with_context(|| format!("Failed to {} {}", verb, name))?;

    ctx.success(format!("✅ Successfully {} {}", done, name));
    Ok(())
}

pub async fn logs(ctx: &Context, uuid: &str, follow: bool) -> Result<()> {
    let client = ctx.client().await?;
    let name = application_name(&client, uuid).await;
    let sink = StdoutSink;

    if !follow {
        sink.append_line(&format!("── Coolify Logs — {} ──", name));
        sink.append_line(&format!("Fetching logs from {}...", client.base_url()));
        sink.append_line("");
        let text = client
            .fetch_application_logs(uuid)
            .await
            .with_context(|| format!("Failed to fetch logs for {}", name))?;
        if text.trim().is_empty() {
            sink.append_line("(No log output)");
        } else {
            sink.append_line(text.trim_end_matches('\n'));
        }
        return Ok(());
    }

    sink.append_line(&format!("── Coolify Live Logs — {} ──", name));
    sink.append_line("Tailing logs… (Ctrl-C to stop)");
    sink.append_line("");

    let cancel = CancelFlag::new();
    let listener = cancel_on_signal(cancel.clone());
    let interval = ctx.settings.poll_interval();
    let mut tail = LogTail::new();

    while !cancel.is_cancelled() {
        match client.fetch_application_logs(uuid).await {
            Ok(text) => {
                let new = tail.advance(&text);
                if !new.is_empty() {
                    sink.append(new);
                }
            }
            Err(e) => sink.append_line(&format!("(fetch error: {})", e)),
        }
        if cancel.is_cancelled() {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    listener.abort();
    sink.append_line("\n🛑 Live log tail stopped.");
    Ok(())
}

/// Program and arguments that hand `url` to the desktop's browser
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(windows) {
        (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

async fn launch_browser(url: &str) -> Result<()> {
    let (program, args) = browser_command(url);
    let status = tokio::process::Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("Failed to run {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

/// Print an application's public URL and open it unless `print_only`
pub async fn open(ctx: &Context, uuid: &str, print_only: bool) -> Result<()> {
    let client = ctx.client().await?;
    let app = client
        .get_application(uuid)
        .await
        .with_context(|| format!("Failed to look up application {}", uuid))?;
    let name = if app.name.is_empty() { uuid } else { app.name.as_str() };

    let Some(url) = app.public_url() else {
        println!(
            "{}",
            format!("{} has no public URL configured in Coolify.", name).yellow()
        );
        return Ok(());
    };

    println!("{}", url);
    if print_only {
        return Ok(());
    }
    if let Err(e) = launch_browser(&url).await {
        warn!("Could not open a browser for {}: {:#}", name, e);
        println!("{}", "Could not open a browser; use the URL above.".yellow());
    }
    Ok(())
}

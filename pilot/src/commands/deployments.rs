//! Deployment listing and cancellation

use anyhow::{bail, Context as _, Result};
use colored::Colorize;

use super::Context;
use crate::models::status::DeploymentStatus;

fn colored_status(status: DeploymentStatus) -> String {
    let label = status.as_str();
    match status {
        DeploymentStatus::Finished => label.green().to_string(),
        DeploymentStatus::Failed | DeploymentStatus::Error => label.red().to_string(),
        DeploymentStatus::Queued | DeploymentStatus::InProgress => label.yellow().to_string(),
        DeploymentStatus::Other => label.dimmed().to_string(),
    }
}

pub async fn list(ctx: &Context, active_only: bool) -> Result<()> {
    let client = ctx.client().await?;
    let deployments = client
        .list_deployments()
        .await
        .context("Failed to list deployments")?;

    let shown: Vec<_> = deployments
        .iter()
        .filter(|d| !active_only || d.status().is_cancellable())
        .collect();

    if shown.is_empty() {
        println!("{}", "No deployments found.".yellow());
        return Ok(());
    }

    for deployment in shown {
        let commit = deployment
            .commit
            .as_deref()
            .map(|c| c.chars().take(7).collect::<String>())
            .unwrap_or_else(|| "-------".to_string());
        println!(
            "{:<12} {:<24} {}  {}  {}",
            colored_status(deployment.status()),
            deployment.application_name.as_deref().unwrap_or("-"),
            commit,
            deployment.key().dimmed(),
            deployment.commit_message.as_deref().unwrap_or("").lines().next().unwrap_or("")
        );
    }
    Ok(())
}

pub async fn cancel(ctx: &Context, uuid: &str) -> Result<()> {
    let client = ctx.client().await?;
    let deployment = client
        .get_deployment(uuid)
        .await
        .with_context(|| format!("Failed to look up deployment {}", uuid))?;

    let status = deployment.status();
    if !status.is_cancellable() {
        bail!(
            "Deployment {} is {} and can no longer be cancelled",
            uuid,
            status
        );
    }

    client
        .cancel_deployment(uuid)
        .await
        .with_context(|| format!("Failed to cancel deployment {}", uuid))?;

    let name = deployment.application_name.as_deref().unwrap_or(uuid);
    ctx.success(format!("🛑 Deployment cancelled for {}", name));
    Ok(())
}

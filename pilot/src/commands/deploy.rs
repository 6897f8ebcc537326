//! deploy and advise

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use tracing::warn;

use super::{application_name, cancel_on_signal, Context};
use crate::deploy::{
    trigger_only, CancelFlag, DeployPipeline, DeployTarget, PipelineOptions, PipelineReport, Stage,
};
use crate::errors::AlreadyReported;
use crate::git::remote::matching_applications;
use crate::git::{GitCli, GitWorkspace};
use crate::http::{CoolifyClient, ControlPlane};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::sink::{LogSink, StdoutSink};

/// Arguments of the `deploy` command
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub uuid: String,
    pub name: Option<String>,
    pub workspace: Option<PathBuf>,
    pub no_workspace: bool,
    pub yes: bool,
}

fn workspace_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to read the current directory"),
    }
}

/// The working copy at `root`, or `None` when it is not a git repository
async fn open_workspace(root: PathBuf, sink: &dyn LogSink) -> Option<GitCli> {
    let git = GitCli::new(root);
    if git.current_branch().await.is_some() {
        return Some(git);
    }
    warn!("{} is not a git working copy", git.root().display());
    sink.stamped(&format!(
        "⚠️  {} is not a git repository — deploying without a workspace.",
        git.root().display()
    ));
    None
}

/// Exit status of a finished run; the pipeline has already notified the user
fn summarize(report: &PipelineReport, target: &DeployTarget) -> Result<()> {
    match report.stage {
        Stage::Done | Stage::Cancelled => Ok(()),
        _ => Err(AlreadyReported(format!(
            "Deploy pipeline for {} failed: {}",
            target.name,
            report.reason.as_deref().unwrap_or("unknown error")
        ))
        .into()),
    }
}

async fn run_pipeline(
    ctx: &Context,
    client: CoolifyClient,
    target: DeployTarget,
    workspace: Option<&GitCli>,
    prompter: Arc<dyn Prompter>,
    sink: Arc<dyn LogSink>,
) -> Result<()> {
    let options = PipelineOptions {
        poll_interval: ctx.settings.poll_interval(),
        ..PipelineOptions::default()
    };
    let control: Arc<dyn ControlPlane> = Arc::new(client);
    let pipeline = DeployPipeline::new(control, prompter, sink, options);

    let cancel = CancelFlag::new();
    let listener = cancel_on_signal(cancel.clone());
    let report = pipeline
        .run(&target, workspace.map(|w| w as &dyn GitWorkspace), &cancel)
        .await;
    listener.abort();

    summarize(&report, &target)
}

pub async fn deploy(ctx: &Context, request: DeployRequest) -> Result<()> {
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new(request.yes));
    let sink: Arc<dyn LogSink> = Arc::new(StdoutSink);

    let client = ctx.client().await.context("Deploy pipeline error")?;

    let name = match request.name {
        Some(name) => name,
        None => application_name(&client, &request.uuid).await,
    };
    let target = DeployTarget::new(request.uuid, name);

    let workspace = if request.no_workspace {
        None
    } else {
        let root = workspace_root(request.workspace)?;
        open_workspace(root, sink.as_ref()).await
    };

    run_pipeline(ctx, client, target, workspace.as_ref(), prompter, sink).await
}

/// Trigger a deployment and return without following it
pub async fn quick_deploy(ctx: &Context, uuid: &str, name: Option<String>) -> Result<()> {
    let client = ctx.client().await?;
    let name = match name {
        Some(name) => name,
        None => application_name(&client, uuid).await,
    };
    let target = DeployTarget::new(uuid, name);
    let prompter = TerminalPrompter::default();

    match trigger_only(&client, &prompter, &target).await {
        Ok(Some(id)) => {
            println!("Deployment UUID: {}", id);
            println!("Follow it with `coolify-pilot logs {} --follow`.", target.uuid);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(AlreadyReported(format!("Deploy failed for {}: {}", target.name, e)).into()),
    }
}

pub async fn advise(ctx: &Context, workspace: Option<PathBuf>, yes: bool) -> Result<()> {
    let git = GitCli::new(workspace_root(workspace)?);
    let Some(branch) = git.current_branch().await else {
        bail!("{} is not a git repository", git.root().display());
    };
    let remote = git.remote_url().await;

    let client = ctx.client().await?;
    let apps = client
        .list_applications()
        .await
        .context("Failed to list applications")?;
    let matches = matching_applications(&apps, &branch, remote.as_deref());

    match matches.as_slice() {
        [] => {
            println!("No Coolify application deploys from `{}`.", branch);
            Ok(())
        }
        [app] => {
            let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter::new(yes));
            let question = format!(
                "\"{}\" is configured to deploy from `{}`. Deploy now?",
                app.name, branch
            );
            if !prompter.confirm(&question).await {
                return Ok(());
            }
            let target = DeployTarget::new(app.uuid.clone(), app.name.clone());
            let sink: Arc<dyn LogSink> = Arc::new(StdoutSink);
            run_pipeline(ctx, client.clone(), target, Some(&git), prompter, sink).await
        }
        several => {
            println!("Applications deploying from `{}`:", branch);
            for app in several {
                println!(
                    "  {:<28} {}  {}",
                    app.name.bold(),
                    app.uuid.dimmed(),
                    app.fqdn.as_deref().unwrap_or("")
                );
            }
            println!("Run `coolify-pilot deploy <uuid>` to deploy one of them.");
            Ok(())
        }
    }
}

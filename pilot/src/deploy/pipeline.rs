//! Deploy pipeline orchestrator
//!
//! One run takes a single application through pre-flight checks, git push,
//! commit verification, the deploy trigger, build-log tailing and live
//! app-log tailing. Stages run strictly in sequence; the FSM decides which
//! stage comes next and every stage ends by feeding it exactly one event.
//!
//! Failures inside polling loops are written to the sink and the loop keeps
//! going. Failures of the push or the trigger end the run. Every terminal
//! outcome produces exactly one notification.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::deploy::cancel::CancelFlag;
use crate::deploy::fsm::{PipelineEvent, PipelineFsm, Stage};
use crate::deploy::tail::LogTail;
use crate::errors::PilotError;
use crate::git::workspace::{GitWorkspace, PushOutcome};
use crate::http::control_plane::ControlPlane;
use crate::models::status::DeploymentStatus;
use crate::prompt::{Notice, Prompter};
use crate::sink::{timestamp, LogSink};

/// Pipeline timing settings
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Delay between build-log and app-log fetches
    pub poll_interval: Duration,

    /// Delay between commit verification attempts
    pub verify_interval: Duration,

    /// Maximum commit verification attempts
    pub verify_attempts: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            verify_interval: Duration::from_secs(3),
            verify_attempts: 20, // 20 x 3s = 60s
        }
    }
}

/// The application a run deploys
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub uuid: String,
    pub name: String,
}

impl DeployTarget {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

/// How build-log polling ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    Failed(DeploymentStatus),
    Cancelled,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Terminal stage
    pub stage: Stage,

    /// Stages entered, in order
    pub history: Vec<Stage>,

    /// Failure or cancellation reason
    pub reason: Option<String>,

    pub local_commit: Option<String>,

    /// Commit verification attempts made
    pub verify_attempts: u32,

    pub commit_verified: bool,

    pub deploy_id: Option<String>,

    pub build: Option<BuildOutcome>,
}

impl PipelineReport {
    pub fn visited(&self, stage: Stage) -> bool {
        self.history.contains(&stage)
    }
}

/// Whether the platform's commit is the local one.
///
/// Either side may be abbreviated: matches when the local hash starts with
/// the remote one, or the remote one starts with the first 8 characters of
/// the local hash.
pub fn commit_matches(local: &str, remote: &str) -> bool {
    let local = local.trim().to_ascii_lowercase();
    let remote = remote.trim().to_ascii_lowercase();
    if local.is_empty() || remote.is_empty() {
        return false;
    }
    let short = local.get(..8).unwrap_or(&local);
    local.starts_with(&remote) || remote.starts_with(short)
}

fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// Per-run state; never shared between runs
struct Run<'r> {
    target: &'r DeployTarget,
    workspace: Option<&'r dyn GitWorkspace>,
    cancel: &'r CancelFlag,
    fsm: PipelineFsm,
    local_commit: Option<String>,
    verify_attempts: u32,
    commit_verified: bool,
    deploy_id: Option<String>,
    build: Option<BuildOutcome>,
    notified: bool,
}

impl Run<'_> {
    fn advance(&mut self, event: PipelineEvent) -> Result<Stage, PilotError> {
        let from = self.fsm.stage();
        let to = self.fsm.process(event).map_err(PilotError::Internal)?;
        info!("Pipeline {}: {:?} -> {:?}", self.target.name, from, to);
        Ok(to)
    }
}

/// Deploy pipeline orchestrator
pub struct DeployPipeline {
    control: Arc<dyn ControlPlane>,
    prompter: Arc<dyn Prompter>,
    sink: Arc<dyn LogSink>,
    options: PipelineOptions,
}

impl DeployPipeline {
    pub fn new(
        control: Arc<dyn ControlPlane>,
        prompter: Arc<dyn Prompter>,
        sink: Arc<dyn LogSink>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            control,
            prompter,
            sink,
            options,
        }
    }

    /// Run the pipeline for `target`.
    ///
    /// `workspace` is `None` when no local working copy is open, in which
    /// case push and commit verification are skipped.
    pub async fn run(
        &self,
        target: &DeployTarget,
        workspace: Option<&dyn GitWorkspace>,
        cancel: &CancelFlag,
    ) -> PipelineReport {
        let mut run = Run {
            target,
            workspace,
            cancel,
            fsm: PipelineFsm::new(),
            local_commit: None,
            verify_attempts: 0,
            commit_verified: false,
            deploy_id: None,
            build: None,
            notified: false,
        };

        self.header(target);

        if let Err(e) = self.drive(&mut run).await {
            error!("Deploy pipeline for {} aborted: {}", target.name, e);
            if !run.fsm.stage().is_terminal() {
                let _ = run.fsm.process(PipelineEvent::Fail(e.to_string()));
            }
            self.sink.stamped(&format!("❌ Pipeline error: {}", e));
            if !run.notified {
                self.notify(
                    &mut run.notified,
                    Notice::Error(format!("Deploy pipeline error: {}", e)),
                );
            }
        }

        PipelineReport {
            stage: run.fsm.stage(),
            history: run.fsm.history().to_vec(),
            reason: run.fsm.reason().map(str::to_string),
            local_commit: run.local_commit,
            verify_attempts: run.verify_attempts,
            commit_verified: run.commit_verified,
            deploy_id: run.deploy_id,
            build: run.build,
        }
    }

    async fn drive(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        loop {
            match run.fsm.stage() {
                Stage::Preflight => self.preflight(run).await?,
                Stage::Push => self.push(run).await?,
                Stage::VerifyCommit => self.verify_commit(run).await?,
                Stage::Trigger => self.trigger(run).await?,
                Stage::PollBuild => self.poll_build(run).await?,
                Stage::PollAppLogs => self.poll_app_logs(run).await?,
                Stage::Done | Stage::Failed | Stage::Cancelled => return Ok(()),
            }
        }
    }

    fn header(&self, target: &DeployTarget) {
        let rule = "═".repeat(58);
        self.sink.append_line(&format!("╔{}╗", rule));
        self.sink
            .append_line(&format!("║  Coolify Deploy Pipeline — {:<28} ║", target.name));
        self.sink
            .append_line(&format!("║  Started: {:<46} ║", timestamp()));
        self.sink.append_line(&format!("╚{}╝", rule));
    }

    fn notify(&self, notified: &mut bool, notice: Notice) {
        *notified = true;
        self.prompter.notify(notice);
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    async fn preflight(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        let Some(workspace) = run.workspace else {
            self.sink.banner("🔀  STAGE 1 — Git Push");
            self.sink.stamped("⏭  No workspace open — skipping git push.");
            self.sink.banner("✅  STAGE 2 — Commit Verification");
            self.sink.stamped("⏭  Skipped (no workspace).");
            run.advance(PipelineEvent::SkipGit)?;
            return Ok(());
        };

        self.sink.banner("🔍  PRE-FLIGHT — Local Checks");
        let local = workspace.snapshot().await;

        match local.uncommitted {
            Some(true) => {
                let proceed = self
                    .prompter
                    .confirm("You have uncommitted changes. Only committed files will be pushed to Coolify. Proceed anyway?")
                    .await;
                if !proceed {
                    return self.decline(run, "uncommitted changes");
                }
                self.sink
                    .stamped("⚠️  Proceeding with uncommitted changes (they will not be deployed).");
            }
            Some(false) => self.sink.stamped("Working tree clean."),
            None => self.sink.stamped("⚠️  Could not check git status."),
        }

        match local.branch {
            Some(local_branch) => match self.control.get_application(&run.target.uuid).await {
                Ok(app) => match app.deploy_branch() {
                    Some(remote_branch) if remote_branch != local_branch => {
                        let proceed = self
                            .prompter
                            .confirm(&format!(
                                "Coolify expects branch '{}', but your local branch is '{}'. Your push might not trigger the correct deployment. Proceed anyway?",
                                remote_branch, local_branch
                            ))
                            .await;
                        if !proceed {
                            return self.decline(run, "branch mismatch");
                        }
                        self.sink.stamped(&format!(
                            "⚠️  Proceeding from '{}' although Coolify deploys '{}'.",
                            local_branch, remote_branch
                        ));
                    }
                    Some(_) => self
                        .sink
                        .stamped(&format!("Branch '{}' matches Coolify.", local_branch)),
                    None => self.sink.stamped(&format!(
                        "Local branch '{}' (Coolify reports no deploy branch).",
                        local_branch
                    )),
                },
                Err(e) => self
                    .sink
                    .stamped(&format!("⚠️  Could not verify git branch match: {}", e)),
            },
            None => self.sink.stamped("⚠️  Could not read local git branch."),
        }

        run.local_commit = local.head;
        match &run.local_commit {
            Some(sha) => self.sink.stamped(&format!("Local HEAD: {}", short_sha(sha))),
            None => self.sink.stamped("⚠️  Could not read local git SHA."),
        }

        run.advance(PipelineEvent::Proceed)?;
        Ok(())
    }

    fn decline(&self, run: &mut Run<'_>, reason: &str) -> Result<(), PilotError> {
        self.sink
            .stamped(&format!("🛑 Deployment cancelled by user ({}).", reason));
        self.notify(
            &mut run.notified,
            Notice::Warning(format!(
                "Deployment of {} cancelled ({}).",
                run.target.name, reason
            )),
        );
        run.advance(PipelineEvent::Decline(reason.to_string()))?;
        Ok(())
    }

    async fn push(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        let workspace = run
            .workspace
            .ok_or_else(|| PilotError::Internal("push stage reached without a workspace".to_string()))?;

        self.sink.banner("🔀  STAGE 1 — Git Push");
        self.sink.stamped("Running: git push origin HEAD");

        let failure = match workspace.push(self.sink.as_ref()).await {
            PushOutcome::Succeeded => None,
            PushOutcome::Exited(Some(code)) => Some(format!("git push exited with code {}", code)),
            PushOutcome::Exited(None) => Some("git push was terminated by a signal".to_string()),
            PushOutcome::SpawnFailed(e) => Some(format!("git push error: {}", e)),
        };

        if let Some(failure) = failure {
            self.sink.stamped(&format!("❌ {}.", failure));
            self.notify(
                &mut run.notified,
                Notice::Error(format!(
                    "Git push failed for {}. See the pipeline output for details.",
                    run.target.name
                )),
            );
            run.advance(PipelineEvent::Fail(failure))?;
            return Ok(());
        }

        self.sink.stamped("✅ Git push succeeded.");
        if run.local_commit.is_some() {
            run.advance(PipelineEvent::Proceed)?;
        } else {
            run.advance(PipelineEvent::SkipVerify)?;
        }
        Ok(())
    }

    async fn verify_commit(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        let local = run
            .local_commit
            .clone()
            .ok_or_else(|| PilotError::Internal("commit verification without a local commit".to_string()))?;
        let attempts = self.options.verify_attempts;

        self.sink.banner("✅  STAGE 2 — Commit Verification");
        self.sink.stamped(&format!(
            "Waiting for Coolify to detect commit: {}",
            short_sha(&local)
        ));

        for attempt in 1..=attempts {
            if run.cancel.is_cancelled() {
                return self.cancelled(run, "Deployment cancelled before it was triggered.");
            }

            run.verify_attempts = attempt;
            match self.control.get_application(&run.target.uuid).await {
                Ok(app) => {
                    let remote = app.commit_sha();
                    self.sink.stamped(&format!(
                        "Attempt {}/{} — Coolify SHA: {}",
                        attempt,
                        attempts,
                        remote.map(short_sha).unwrap_or("unknown")
                    ));
                    if remote.is_some_and(|remote| commit_matches(&local, remote)) {
                        self.sink.stamped("✅ Commit verified on Coolify!");
                        run.commit_verified = true;
                        run.advance(PipelineEvent::Proceed)?;
                        return Ok(());
                    }
                }
                Err(e) => self.sink.stamped(&format!("(poll error: {})", e)),
            }

            if attempt < attempts {
                self.pause(self.options.verify_interval).await;
            }
        }

        warn!("Commit {} not visible on Coolify after {} attempts", short_sha(&local), attempts);
        self.sink.stamped(
            "⚠️  Commit not yet visible on Coolify — continuing anyway (webhook may handle it).",
        );
        run.advance(PipelineEvent::Proceed)?;
        Ok(())
    }

    async fn trigger(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        self.sink.banner("🚀  STAGE 3 — Triggering Deployment");

        if run.cancel.is_cancelled() {
            return self.cancelled(run, "Deployment cancelled before it was triggered.");
        }

        match self.control.trigger_deployment(&run.target.uuid).await {
            Err(e) => {
                self.sink
                    .stamped(&format!("❌ Failed to start deployment: {}", e));
                self.notify(
                    &mut run.notified,
                    Notice::Error(format!(
                        "Failed to start deployment for {}: {}",
                        run.target.name, e
                    )),
                );
                run.advance(PipelineEvent::Fail(e.to_string()))?;
            }
            Ok(None) => {
                self.sink.stamped(
                    "⚠️  Deployment started but no UUID returned — cannot stream logs.",
                );
                self.notify(
                    &mut run.notified,
                    Notice::Info(format!("🚀 Deployment started for {}", run.target.name)),
                );
                run.advance(PipelineEvent::Untracked)?;
            }
            Ok(Some(id)) => {
                self.sink.stamped(&format!("Deploy UUID: {}", id));
                run.deploy_id = Some(id);
                run.advance(PipelineEvent::Proceed)?;
            }
        }
        Ok(())
    }

    async fn poll_build(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        let deploy_id = run
            .deploy_id
            .clone()
            .ok_or_else(|| PilotError::Internal("build polling without a deployment id".to_string()))?;

        self.sink.banner("📋  STAGE 4 — Live Deploy Logs");
        self.sink.stamped("Polling for build logs...");

        let mut tail = LogTail::new();
        let mut mid_line = false;

        let outcome = loop {
            if run.cancel.is_cancelled() {
                break BuildOutcome::Cancelled;
            }
            self.pause(self.options.poll_interval).await;
            if run.cancel.is_cancelled() {
                break BuildOutcome::Cancelled;
            }

            match self.control.get_deployment(&deploy_id).await {
                Ok(deployment) => {
                    if let Some(text) = deployment.log_text() {
                        let new = tail.advance(text);
                        if !new.is_empty() {
                            self.sink.append(new);
                            mid_line = !new.ends_with('\n');
                        }
                    }

                    let status = deployment.status();
                    if status.is_terminal() {
                        break if status.is_success() {
                            BuildOutcome::Succeeded
                        } else {
                            BuildOutcome::Failed(status)
                        };
                    }
                }
                Err(e) => {
                    if mid_line {
                        self.sink.append("\n");
                        mid_line = false;
                    }
                    self.sink.stamped(&format!("(log poll error: {})", e));
                }
            }
        };

        if mid_line {
            self.sink.append("\n");
        }
        run.build = Some(outcome);

        match outcome {
            BuildOutcome::Succeeded => {
                self.sink.stamped("✅ Deployment FINISHED.");
                self.notify(
                    &mut run.notified,
                    Notice::Info(format!("✅ Deployment successful: {}", run.target.name)),
                );
                run.advance(PipelineEvent::Proceed)?;
            }
            BuildOutcome::Failed(status) => {
                self.sink.stamped(&format!(
                    "❌ Deployment {}.",
                    status.as_str().to_ascii_uppercase()
                ));
                self.notify(
                    &mut run.notified,
                    Notice::Error(format!(
                        "❌ Deployment failed: {} ({})",
                        run.target.name, status
                    )),
                );
                run.advance(PipelineEvent::Fail(format!("deployment {}", status)))?;
            }
            BuildOutcome::Cancelled => {
                return self.cancelled(
                    run,
                    "Stopped following the deployment; it keeps running on Coolify.",
                );
            }
        }
        Ok(())
    }

    async fn poll_app_logs(&self, run: &mut Run<'_>) -> Result<(), PilotError> {
        self.sink.banner("📡  STAGE 5 — Live App Logs");
        self.sink.stamped(&format!(
            "Tailing app logs for {}… (press Ctrl-C to stop)",
            run.target.name
        ));

        let mut tail = LogTail::new();
        while !run.cancel.is_cancelled() {
            match self.control.fetch_application_logs(&run.target.uuid).await {
                Ok(logs) => {
                    let new = tail.advance(&logs);
                    if !new.is_empty() {
                        self.sink.append(new);
                    }
                }
                Err(e) => self
                    .sink
                    .stamped(&format!("(app log fetch error: {})", e)),
            }
            self.pause(self.options.poll_interval).await;
        }

        self.sink.append("\n");
        self.sink.stamped("🛑 App log tailing stopped.");
        run.advance(PipelineEvent::Cancel)?;
        Ok(())
    }

    fn cancelled(&self, run: &mut Run<'_>, message: &str) -> Result<(), PilotError> {
        self.sink.stamped(&format!("🛑 {}", message));
        self.notify(
            &mut run.notified,
            Notice::Warning(format!("{}: {}", run.target.name, message)),
        );
        run.advance(PipelineEvent::Cancel)?;
        Ok(())
    }
}

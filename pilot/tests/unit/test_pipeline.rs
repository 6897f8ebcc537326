//! Deploy pipeline scenarios against in-memory fakes

use std::sync::Arc;
use std::time::Duration;

use coolify_pilot::deploy::{
    trigger_only, BuildOutcome, CancelFlag, DeployPipeline, DeployTarget, PipelineOptions, Stage,
};
use coolify_pilot::git::{GitWorkspace, PushOutcome};
use coolify_pilot::models::status::DeploymentStatus;
use coolify_pilot::prompt::Notice;
use coolify_pilot::sink::MemorySink;

use crate::fakes::{
    application, deployment, FakeControlPlane, FakeGit, RecordingPrompter, TriggerScript,
};

fn fast_options() -> PipelineOptions {
    PipelineOptions {
        poll_interval: Duration::from_millis(1),
        verify_interval: Duration::from_millis(1),
        verify_attempts: 3,
    }
}

struct Harness {
    control: Arc<FakeControlPlane>,
    prompter: Arc<RecordingPrompter>,
    sink: MemorySink,
    options: PipelineOptions,
}

impl Harness {
    fn new(control: FakeControlPlane) -> Self {
        Self::with_prompter(control, RecordingPrompter::default())
    }

    fn with_prompter(control: FakeControlPlane, prompter: RecordingPrompter) -> Self {
        Self {
            control: Arc::new(control),
            prompter: Arc::new(prompter),
            sink: MemorySink::new(),
            options: fast_options(),
        }
    }

    fn pipeline(&self) -> DeployPipeline {
        DeployPipeline::new(
            self.control.clone(),
            self.prompter.clone(),
            Arc::new(self.sink.clone()),
            self.options.clone(),
        )
    }

    fn target() -> DeployTarget {
        DeployTarget::new("app-1", "shop")
    }
}

fn count(counter: &std::sync::atomic::AtomicUsize) -> usize {
    FakeControlPlane::count(counter)
}

#[tokio::test]
async fn test_full_run_verifies_commit_and_reports_once() {
    let cancel = CancelFlag::new();
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .with_applications(vec![
            application("main", None),
            application("main", Some("0f9e8d7c")),
            application("main", Some("abc12345")),
        ])
        .with_deployments(vec![
            deployment("in_progress", "step 1\nstep"),
            deployment("in_progress", "step 1\nstep 2\n"),
            deployment("finished", "step 1\nstep 2\ndone\n"),
        ])
        .with_app_logs(vec!["listening on :3000\n"])
        .cancel_after_log_fetches(2, cancel.clone());
    let harness = Harness::new(control);
    let git = FakeGit::clean();

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &cancel)
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert_eq!(
        report.history,
        vec![
            Stage::Preflight,
            Stage::Push,
            Stage::VerifyCommit,
            Stage::Trigger,
            Stage::PollBuild,
            Stage::PollAppLogs,
            Stage::Done,
        ]
    );
    assert_eq!(report.verify_attempts, 2);
    assert!(report.commit_verified);
    assert_eq!(report.deploy_id.as_deref(), Some("dep-1"));
    assert_eq!(report.build, Some(BuildOutcome::Succeeded));

    // one lookup for the branch check, two verification attempts
    assert_eq!(count(&harness.control.get_application_calls), 3);
    assert_eq!(count(&harness.control.get_deployment_calls), 3);
    assert_eq!(count(&harness.control.log_calls), 2);

    let output = harness.sink.contents();
    assert!(output.contains("step 1\nstep 2\ndone\n"));
    assert_eq!(output.matches("step 1").count(), 1);
    assert_eq!(output.matches("listening on :3000").count(), 1);
    assert!(output.contains("To github.com:acme/shop.git"));

    assert_eq!(
        harness.prompter.notices(),
        vec![Notice::Info("✅ Deployment successful: shop".to_string())]
    );
    assert!(harness.prompter.questions().is_empty());
}

#[tokio::test]
async fn test_failed_build_reports_once_and_skips_app_logs() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .with_deployments(vec![
            deployment("queued", ""),
            deployment("failed", "error: build step failed\n"),
        ]);
    let harness = Harness::new(control);

    let report = harness
        .pipeline()
        .run(&Harness::target(), None, &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Failed);
    assert_eq!(report.build, Some(BuildOutcome::Failed(DeploymentStatus::Failed)));
    assert_eq!(count(&harness.control.get_deployment_calls), 2);
    assert_eq!(count(&harness.control.log_calls), 0);
    assert!(!report.visited(Stage::PollAppLogs));

    let notices = harness.prompter.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(&notices[0], Notice::Error(m) if m == "❌ Deployment failed: shop (failed)"));
}

#[tokio::test]
async fn test_non_terminal_statuses_keep_polling() {
    let cancel = CancelFlag::new();
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .with_deployments(vec![
            deployment("queued", ""),
            deployment("in_progress", "layer-a\n"),
            deployment("cancelled-by-user", "layer-a\n"),
            deployment("error", "layer-a\nlayer-b\n"),
        ])
        .cancel_after_log_fetches(1, cancel.clone());
    let harness = Harness::new(control);

    let report = harness.pipeline().run(&Harness::target(), None, &cancel).await;

    assert_eq!(count(&harness.control.get_deployment_calls), 4);
    assert_eq!(report.build, Some(BuildOutcome::Failed(DeploymentStatus::Error)));
    assert_eq!(harness.prompter.notices().len(), 1);
    let output = harness.sink.contents();
    assert_eq!(output.matches("layer-a").count(), 1);
    assert_eq!(output.matches("layer-b").count(), 1);
}

#[tokio::test]
async fn test_push_failure_never_triggers() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()));
    let harness = Harness::new(control);
    let git = FakeGit {
        outcome: PushOutcome::Exited(Some(128)),
        ..FakeGit::clean()
    };

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Failed);
    assert_eq!(report.reason.as_deref(), Some("git push exited with code 128"));
    assert_eq!(count(&harness.control.trigger_calls), 0);
    assert!(harness.sink.contents().contains("fatal: could not read from remote repository"));

    let notices = harness.prompter.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(&notices[0], Notice::Error(m) if m.starts_with("Git push failed for shop")));
}

#[tokio::test]
async fn test_untracked_deploy_stops_after_trigger() {
    let control = FakeControlPlane::new(TriggerScript::Untracked);
    let harness = Harness::new(control);

    let report = harness
        .pipeline()
        .run(&Harness::target(), None, &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert_eq!(report.history, vec![Stage::Preflight, Stage::Trigger, Stage::Done]);
    assert!(report.deploy_id.is_none());
    assert_eq!(count(&harness.control.get_deployment_calls), 0);
    assert_eq!(count(&harness.control.log_calls), 0);
    assert_eq!(
        harness.prompter.notices(),
        vec![Notice::Info("🚀 Deployment started for shop".to_string())]
    );
}

#[tokio::test]
async fn test_no_workspace_skips_git_and_prompts() {
    let cancel = CancelFlag::new();
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .cancel_after_log_fetches(1, cancel.clone());
    let harness = Harness::new(control);

    let report = harness.pipeline().run(&Harness::target(), None, &cancel).await;

    assert_eq!(report.stage, Stage::Done);
    assert!(!report.visited(Stage::Push));
    assert!(!report.visited(Stage::VerifyCommit));
    assert_eq!(report.verify_attempts, 0);
    assert!(harness.prompter.questions().is_empty());
    assert_eq!(count(&harness.control.get_application_calls), 0);
    assert!(harness.sink.contents().contains("No workspace open"));
}

#[tokio::test]
async fn test_cancel_during_wait_stops_fetching() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .with_deployments(vec![deployment("in_progress", "building\n")]);
    let mut harness = Harness::new(control);
    harness.options.poll_interval = Duration::from_millis(100);

    let cancel = CancelFlag::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        })
    };

    let report = harness.pipeline().run(&Harness::target(), None, &cancel).await;
    canceller.await.unwrap();

    assert_eq!(report.stage, Stage::Cancelled);
    assert_eq!(report.build, Some(BuildOutcome::Cancelled));
    assert_eq!(count(&harness.control.get_deployment_calls), 1);
    assert_eq!(count(&harness.control.log_calls), 0);

    let notices = harness.prompter.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::Warning(_)));
}

#[tokio::test]
async fn test_cancel_before_trigger() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()));
    let harness = Harness::new(control);
    let cancel = CancelFlag::new();
    cancel.cancel();

    let report = harness.pipeline().run(&Harness::target(), None, &cancel).await;

    assert_eq!(report.stage, Stage::Cancelled);
    assert_eq!(count(&harness.control.trigger_calls), 0);
    assert_eq!(harness.prompter.notices().len(), 1);
}

#[tokio::test]
async fn test_declining_uncommitted_changes_cancels() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()));
    let harness = Harness::with_prompter(control, RecordingPrompter::answering(vec![false]));
    let git = FakeGit {
        uncommitted: Some(true),
        ..FakeGit::clean()
    };

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Cancelled);
    assert_eq!(report.reason.as_deref(), Some("uncommitted changes"));
    assert_eq!(count(&git.push_calls), 0);
    assert_eq!(count(&harness.control.trigger_calls), 0);
    assert_eq!(harness.prompter.questions().len(), 1);
    assert!(harness.prompter.questions()[0].contains("uncommitted changes"));

    let notices = harness.prompter.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::Warning(_)));
}

#[tokio::test]
async fn test_branch_mismatch_asks_before_pushing() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()));
    let harness = Harness::with_prompter(control, RecordingPrompter::answering(vec![false]));
    let git = FakeGit {
        branch: Some("feature/cart".to_string()),
        ..FakeGit::clean()
    };

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Cancelled);
    assert_eq!(report.reason.as_deref(), Some("branch mismatch"));
    assert_eq!(count(&git.push_calls), 0);
    let questions = harness.prompter.questions();
    assert_eq!(questions.len(), 1);
    assert!(questions[0].contains("Coolify expects branch 'main', but your local branch is 'feature/cart'"));
}

#[tokio::test]
async fn test_branch_mismatch_can_be_overridden() {
    let cancel = CancelFlag::new();
    let control = FakeControlPlane::new(TriggerScript::Untracked)
        .with_applications(vec![application("main", Some("abc12345"))]);
    let harness = Harness::with_prompter(control, RecordingPrompter::answering(vec![true]));
    let git = FakeGit {
        branch: Some("develop".to_string()),
        ..FakeGit::clean()
    };

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &cancel)
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert_eq!(count(&git.push_calls), 1);
    assert_eq!(report.verify_attempts, 1);
    assert!(report.commit_verified);
}

#[tokio::test]
async fn test_unverified_commit_still_triggers() {
    let control = FakeControlPlane::new(TriggerScript::Untracked);
    let harness = Harness::new(control);
    let git = FakeGit::clean();

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.verify_attempts, 3);
    assert!(!report.commit_verified);
    assert_eq!(count(&harness.control.trigger_calls), 1);
    assert!(harness.sink.contents().contains("continuing anyway"));
}

#[tokio::test]
async fn test_unknown_head_skips_verification() {
    let control = FakeControlPlane::new(TriggerScript::Untracked);
    let harness = Harness::new(control);
    let git = FakeGit {
        head: None,
        ..FakeGit::clean()
    };

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert!(report.visited(Stage::Push));
    assert!(!report.visited(Stage::VerifyCommit));
    // only the branch check reads the application
    assert_eq!(count(&harness.control.get_application_calls), 1);
}

#[tokio::test]
async fn test_rejected_trigger_fails_with_one_error() {
    let control = FakeControlPlane::new(TriggerScript::Rejected);
    let harness = Harness::new(control);

    let report = harness
        .pipeline()
        .run(&Harness::target(), None, &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Failed);
    assert_eq!(count(&harness.control.get_deployment_calls), 0);
    let notices = harness.prompter.notices();
    assert_eq!(notices.len(), 1);
    assert!(matches!(&notices[0], Notice::Error(m) if m.starts_with("Failed to start deployment for shop")));
}

#[tokio::test]
async fn test_transient_verify_error_retries_on_next_attempt() {
    let control = FakeControlPlane::new(TriggerScript::Untracked).with_application_results(vec![
        Ok(application("main", None)),
        Err("connection reset"),
        Ok(application("main", Some("abc12345"))),
    ]);
    let harness = Harness::new(control);
    let git = FakeGit::clean();

    let report = harness
        .pipeline()
        .run(&Harness::target(), Some(&git as &dyn GitWorkspace), &CancelFlag::new())
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert_eq!(report.verify_attempts, 2);
    assert!(report.commit_verified);
    assert_eq!(count(&harness.control.trigger_calls), 1);

    let output = harness.sink.contents();
    assert!(output.contains("(poll error: Internal error: connection reset)"));
    assert!(output.contains("✅ Commit verified on Coolify!"));
    assert_eq!(
        harness.prompter.notices(),
        vec![Notice::Info("🚀 Deployment started for shop".to_string())]
    );
}

#[tokio::test]
async fn test_transient_log_errors_keep_tailing() {
    let cancel = CancelFlag::new();
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-1".to_string()))
        .with_deployment_results(vec![
            Ok(deployment("in_progress", "step 1\n")),
            Err("gateway timeout"),
            Ok(deployment("finished", "step 1\nstep 2\n")),
        ])
        .with_app_log_results(vec![Err("service unavailable"), Ok("ready\n")])
        .cancel_after_log_fetches(2, cancel.clone());
    let harness = Harness::new(control);

    let report = harness
        .pipeline()
        .run(&Harness::target(), None, &cancel)
        .await;

    assert_eq!(report.stage, Stage::Done);
    assert_eq!(report.build, Some(BuildOutcome::Succeeded));
    assert_eq!(count(&harness.control.get_deployment_calls), 3);
    assert_eq!(count(&harness.control.log_calls), 2);

    let output = harness.sink.contents();
    assert!(output.contains("(log poll error: Internal error: gateway timeout)"));
    assert!(output.contains("(app log fetch error: Internal error: service unavailable)"));
    assert_eq!(output.matches("step 1").count(), 1);
    assert_eq!(output.matches("step 2").count(), 1);
    assert!(output.contains("ready\n"));
    assert_eq!(
        harness.prompter.notices(),
        vec![Notice::Info("✅ Deployment successful: shop".to_string())]
    );
}

#[tokio::test]
async fn test_trigger_only_reports_id_without_polling() {
    let control = FakeControlPlane::new(TriggerScript::Tracked("dep-9".to_string()));
    let prompter = RecordingPrompter::default();

    let id = trigger_only(&control, &prompter, &Harness::target())
        .await
        .unwrap();

    assert_eq!(id.as_deref(), Some("dep-9"));
    assert_eq!(count(&control.trigger_calls), 1);
    assert_eq!(count(&control.get_deployment_calls), 0);
    assert_eq!(count(&control.log_calls), 0);
    assert_eq!(
        prompter.notices(),
        vec![Notice::Info("🚀 shop deployment started!".to_string())]
    );
}

#[tokio::test]
async fn test_trigger_only_rejection_notifies_once() {
    let control = FakeControlPlane::new(TriggerScript::Rejected);
    let prompter = RecordingPrompter::default();

    let result = trigger_only(&control, &prompter, &Harness::target()).await;

    assert!(result.is_err());
    assert_eq!(
        prompter.notices(),
        vec![Notice::Error(
            "Deploy failed: API request failed (500): Internal Server Error".to_string()
        )]
    );
}

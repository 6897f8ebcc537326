//! In-memory stand-ins for the server, the working copy and the user

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use coolify_pilot::deploy::CancelFlag;
use coolify_pilot::errors::PilotError;
use coolify_pilot::git::{GitWorkspace, PushOutcome};
use coolify_pilot::http::ControlPlane;
use coolify_pilot::models::application::Application;
use coolify_pilot::models::deployment::Deployment;
use coolify_pilot::prompt::{Notice, Prompter};
use coolify_pilot::sink::LogSink;

pub const LOCAL_SHA: &str = "abc12345def67890abc12345def67890abc12345";

pub fn application(branch: &str, commit: Option<&str>) -> Application {
    Application {
        uuid: "app-1".to_string(),
        name: "shop".to_string(),
        status: "running:healthy".to_string(),
        git_repository: Some("acme/shop".to_string()),
        git_branch: Some(branch.to_string()),
        git_commit_sha: commit.map(str::to_string),
        ..Application::default()
    }
}

pub fn deployment(status: &str, logs: &str) -> Deployment {
    Deployment {
        uuid: "dep-1".to_string(),
        status: status.to_string(),
        logs: Some(Value::String(logs.to_string())),
        ..Deployment::default()
    }
}

/// Pops scripted responses in order and repeats the last one
fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

pub enum TriggerScript {
    Tracked(String),
    Untracked,
    Rejected,
}

/// A scripted response; `Err` carries the message of a transient failure
pub type Scripted<T> = Result<T, &'static str>;

fn scripted<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>, missing: &str) -> Result<T, PilotError> {
    match next(queue) {
        Some(Ok(value)) => Ok(value),
        Some(Err(message)) => Err(PilotError::Internal(message.to_string())),
        None => Err(PilotError::Internal(missing.to_string())),
    }
}

pub struct FakeControlPlane {
    applications: Mutex<VecDeque<Scripted<Application>>>,
    deployments: Mutex<VecDeque<Scripted<Deployment>>>,
    app_logs: Mutex<VecDeque<Scripted<String>>>,
    trigger: TriggerScript,
    cancel_after_log_fetches: Option<(usize, CancelFlag)>,

    pub get_application_calls: AtomicUsize,
    pub trigger_calls: AtomicUsize,
    pub get_deployment_calls: AtomicUsize,
    pub log_calls: AtomicUsize,
}

impl FakeControlPlane {
    pub fn new(trigger: TriggerScript) -> Self {
        Self {
            applications: Mutex::new(VecDeque::from([Ok(application("main", None))])),
            deployments: Mutex::new(VecDeque::from([Ok(deployment("finished", ""))])),
            app_logs: Mutex::new(VecDeque::from([Ok(String::new())])),
            trigger,
            cancel_after_log_fetches: None,
            get_application_calls: AtomicUsize::new(0),
            trigger_calls: AtomicUsize::new(0),
            get_deployment_calls: AtomicUsize::new(0),
            log_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_applications(self, apps: Vec<Application>) -> Self {
        self.with_application_results(apps.into_iter().map(Ok).collect())
    }

    pub fn with_application_results(self, apps: Vec<Scripted<Application>>) -> Self {
        *self.applications.lock().unwrap() = apps.into();
        self
    }

    pub fn with_deployments(self, deployments: Vec<Deployment>) -> Self {
        self.with_deployment_results(deployments.into_iter().map(Ok).collect())
    }

    pub fn with_deployment_results(self, deployments: Vec<Scripted<Deployment>>) -> Self {
        *self.deployments.lock().unwrap() = deployments.into();
        self
    }

    pub fn with_app_logs(self, logs: Vec<&str>) -> Self {
        self.with_app_log_results(logs.into_iter().map(Ok).collect())
    }

    pub fn with_app_log_results(self, logs: Vec<Scripted<&str>>) -> Self {
        *self.app_logs.lock().unwrap() = logs
            .into_iter()
            .map(|log| log.map(str::to_string))
            .collect();
        self
    }

    /// Set `flag` once the app log endpoint has been read `count` times
    pub fn cancel_after_log_fetches(mut self, count: usize, flag: CancelFlag) -> Self {
        self.cancel_after_log_fetches = Some((count, flag));
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn get_application(&self, _uuid: &str) -> Result<Application, PilotError> {
        self.get_application_calls.fetch_add(1, Ordering::SeqCst);
        scripted(&self.applications, "no application")
    }

    async fn trigger_deployment(&self, _uuid: &str) -> Result<Option<String>, PilotError> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        match &self.trigger {
            TriggerScript::Tracked(id) => Ok(Some(id.clone())),
            TriggerScript::Untracked => Ok(None),
            TriggerScript::Rejected => Err(PilotError::RequestFailed {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            }),
        }
    }

    async fn get_deployment(&self, _uuid: &str) -> Result<Deployment, PilotError> {
        self.get_deployment_calls.fetch_add(1, Ordering::SeqCst);
        scripted(&self.deployments, "no deployment")
    }

    async fn fetch_application_logs(&self, _uuid: &str) -> Result<String, PilotError> {
        let calls = self.log_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, flag)) = &self.cancel_after_log_fetches {
            if calls >= *limit {
                flag.cancel();
            }
        }
        match next(&self.app_logs) {
            Some(Ok(logs)) => Ok(logs),
            Some(Err(message)) => Err(PilotError::Internal(message.to_string())),
            None => Ok(String::new()),
        }
    }
}

pub struct FakeGit {
    pub uncommitted: Option<bool>,
    pub branch: Option<String>,
    pub head: Option<String>,
    pub remote: Option<String>,
    pub outcome: PushOutcome,
    pub push_calls: AtomicUsize,
}

impl FakeGit {
    /// A clean checkout of `main` at `LOCAL_SHA` whose push succeeds
    pub fn clean() -> Self {
        Self {
            uncommitted: Some(false),
            branch: Some("main".to_string()),
            head: Some(LOCAL_SHA.to_string()),
            remote: Some("git@github.com:acme/shop.git".to_string()),
            outcome: PushOutcome::Succeeded,
            push_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GitWorkspace for FakeGit {
    async fn has_uncommitted_changes(&self) -> Option<bool> {
        self.uncommitted
    }

    async fn current_branch(&self) -> Option<String> {
        self.branch.clone()
    }

    async fn head_commit(&self) -> Option<String> {
        self.head.clone()
    }

    async fn remote_url(&self) -> Option<String> {
        self.remote.clone()
    }

    async fn push(&self, sink: &dyn LogSink) -> PushOutcome {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        sink.append_line("To github.com:acme/shop.git");
        if !self.outcome.is_success() {
            sink.append_line("fatal: could not read from remote repository");
        }
        self.outcome.clone()
    }
}

/// Answers confirmations from a script (default: proceed) and records everything
#[derive(Default)]
pub struct RecordingPrompter {
    answers: Mutex<VecDeque<bool>>,
    pub questions: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingPrompter {
    pub fn answering(answers: Vec<bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for RecordingPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.questions.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

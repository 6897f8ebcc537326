//! Finite state machine for a deploy pipeline run

use serde::{Deserialize, Serialize};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Uncommitted-changes and branch checks
    Preflight,

    /// `git push` of the current branch
    Push,

    /// Waiting for the platform to see the pushed commit
    VerifyCommit,

    /// Asking the platform to deploy
    Trigger,

    /// Tailing the build log until a terminal status
    PollBuild,

    /// Tailing the live application log until cancelled
    PollAppLogs,

    Done,
    Failed,
    Cancelled,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed | Stage::Cancelled)
    }
}

/// Pipeline event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Current stage completed, move to the next one
    Proceed,

    /// No workspace open: skip push and commit verification
    SkipGit,

    /// No local commit known: skip commit verification
    SkipVerify,

    /// User declined a pre-flight confirmation
    Decline(String),

    /// Deploy triggered without an id to track
    Untracked,

    /// Stage failed
    Fail(String),

    /// Cancellation requested
    Cancel,
}

/// Deploy pipeline FSM
#[derive(Debug, Clone)]
pub struct PipelineFsm {
    stage: Stage,
    history: Vec<Stage>,
    reason: Option<String>,
}

impl PipelineFsm {
    /// Create a new FSM at the pre-flight stage
    pub fn new() -> Self {
        Self {
            stage: Stage::Preflight,
            history: vec![Stage::Preflight],
            reason: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage entered so far, in order
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Why the run failed or was cancelled
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Process an event and transition
    pub fn process(&mut self, event: PipelineEvent) -> Result<Stage, String> {
        let next = match (self.stage, &event) {
            (Stage::Preflight, PipelineEvent::Proceed) => Stage::Push,
            (Stage::Preflight, PipelineEvent::SkipGit) => Stage::Trigger,
            (Stage::Preflight, PipelineEvent::Decline(reason)) => {
                self.reason = Some(reason.clone());
                Stage::Cancelled
            }

            (Stage::Push, PipelineEvent::Proceed) => Stage::VerifyCommit,
            (Stage::Push, PipelineEvent::SkipVerify) => Stage::Trigger,

            (Stage::VerifyCommit, PipelineEvent::Proceed) => Stage::Trigger,

            (Stage::Trigger, PipelineEvent::Proceed) => Stage::PollBuild,
            (Stage::Trigger, PipelineEvent::Untracked) => Stage::Done,

            (Stage::PollBuild, PipelineEvent::Proceed) => Stage::PollAppLogs,

            // the deployment outcome is already recorded once app logs are tailing
            (Stage::PollAppLogs, PipelineEvent::Cancel) => Stage::Done,

            (stage, PipelineEvent::Cancel) if !stage.is_terminal() => {
                self.reason = Some(format!("cancelled during {:?}", stage));
                Stage::Cancelled
            }

            (stage, PipelineEvent::Fail(err)) if !stage.is_terminal() => {
                self.reason = Some(err.clone());
                Stage::Failed
            }

            (stage, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", stage, event));
            }
        };

        self.stage = next;
        self.history.push(next);
        Ok(next)
    }
}

impl Default for PipelineFsm {
    fn default() -> Self {
        Self::new()
    }
}

//! Local working copy queries and push
//!
//! Every query shells out to `git`. A query that fails for any reason (no
//! repository, git missing, detached state) answers `None`, which callers
//! treat as "unknown" and proceed without warning.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::sink::LogSink;

/// Pre-flight view of the working copy; `None` fields are unknown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalGitSnapshot {
    pub uncommitted: Option<bool>,
    pub branch: Option<String>,
    pub head: Option<String>,
}

/// Result of `git push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Succeeded,
    /// Non-zero exit; `None` when killed by a signal
    Exited(Option<i32>),
    /// The process could not be run at all
    SpawnFailed(String),
}

impl PushOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PushOutcome::Succeeded)
    }
}

/// A local working copy, as a trait for testability
#[async_trait]
pub trait GitWorkspace: Send + Sync {
    async fn has_uncommitted_changes(&self) -> Option<bool>;

    async fn current_branch(&self) -> Option<String>;

    async fn head_commit(&self) -> Option<String>;

    async fn remote_url(&self) -> Option<String>;

    /// Push the current branch, streaming output to `sink`
    async fn push(&self, sink: &dyn LogSink) -> PushOutcome;

    /// Read the three pre-flight values in one go
    async fn snapshot(&self) -> LocalGitSnapshot {
        LocalGitSnapshot {
            uncommitted: self.has_uncommitted_changes().await,
            branch: self.current_branch().await,
            head: self.head_commit().await,
        }
    }
}

/// `GitWorkspace` backed by the git command line
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a read-only query and return trimmed stdout on success
    async fn query(&self, args: &[&str]) -> Option<String> {
        debug!("git {} (in {})", args.join(" "), self.root.display());
        let output = match Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run git {}: {}", args.join(" "), e);
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        String::from_utf8(output.stdout)
            .ok()
            .map(|s| s.trim().to_string())
    }
}

#[async_trait]
impl GitWorkspace for GitCli {
    async fn has_uncommitted_changes(&self) -> Option<bool> {
        self.query(&["status", "--porcelain"])
            .await
            .map(|status| !status.is_empty())
    }

    async fn current_branch(&self) -> Option<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .filter(|b| !b.is_empty())
    }

    async fn head_commit(&self) -> Option<String> {
        self.query(&["rev-parse", "HEAD"])
            .await
            .filter(|h| !h.is_empty())
    }

    async fn remote_url(&self) -> Option<String> {
        self.query(&["config", "--get", "remote.origin.url"])
            .await
            .filter(|u| !u.is_empty())
    }

    async fn push(&self, sink: &dyn LogSink) -> PushOutcome {
        let mut child = match Command::new("git")
            .current_dir(&self.root)
            .args(["push", "origin", "HEAD"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return PushOutcome::SpawnFailed(e.to_string()),
        };

        // git writes progress to stderr, so both streams go to the sink
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        tokio::join!(pump_lines(stdout, sink), pump_lines(stderr, sink));

        match child.wait().await {
            Ok(status) if status.success() => PushOutcome::Succeeded,
            Ok(status) => PushOutcome::Exited(status.code()),
            Err(e) => PushOutcome::SpawnFailed(e.to_string()),
        }
    }
}

async fn pump_lines<R>(reader: Option<R>, sink: &dyn LogSink)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => sink.append_line(&line),
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped reading git output: {}", e);
                break;
            }
        }
    }
}

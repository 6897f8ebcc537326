//! Local git repository access

pub mod remote;
pub mod workspace;

pub use workspace::{GitCli, GitWorkspace, LocalGitSnapshot, PushOutcome};

//! Deploy pipeline

pub mod cancel;
pub mod fsm;
pub mod pipeline;
pub mod quick;
pub mod tail;

pub use cancel::CancelFlag;
pub use fsm::{PipelineEvent, PipelineFsm, Stage};
pub use pipeline::{
    commit_matches, BuildOutcome, DeployPipeline, DeployTarget, PipelineOptions, PipelineReport,
};
pub use quick::trigger_only;
pub use tail::LogTail;

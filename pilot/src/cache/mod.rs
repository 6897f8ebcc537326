//! In-memory caches

pub mod snapshot;

pub use snapshot::{render_tree, RefreshSummary, ResourceSnapshot, SnapshotData};

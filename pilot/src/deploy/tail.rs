//! Incremental tailing of a log that is re-fetched in full

use tracing::warn;

/// Tracks how much of a growing log has already been emitted
#[derive(Debug, Clone, Default)]
pub struct LogTail {
    seen: usize,
}

impl LogTail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the log emitted so far
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Return the part of `current` not yet emitted and advance the offset.
    ///
    /// A log that did not grow yields an empty string. A log that shrank
    /// (rotated or truncated server-side) yields nothing and keeps the old
    /// offset, so only text beyond the previous high-water mark is emitted.
    pub fn advance<'a>(&mut self, current: &'a str) -> &'a str {
        if current.len() <= self.seen {
            return "";
        }
        match current.get(self.seen..) {
            Some(suffix) => {
                self.seen = current.len();
                suffix
            }
            None => {
                warn!("Log text changed under the tail offset; skipping to the end");
                self.seen = current.len();
                ""
            }
        }
    }
}

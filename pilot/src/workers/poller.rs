//! Periodic resource snapshot refresh

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{RefreshSummary, ResourceSnapshot};
use crate::http::ResourceSource;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Time between refreshes
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Refresh `snapshot` immediately and then every `options.interval` until
/// `shutdown_signal` resolves. `on_refresh` runs after each refresh.
pub async fn run<S, F, R>(
    options: &Options,
    source: &dyn ResourceSource,
    snapshot: &ResourceSnapshot,
    sleep_fn: S,
    mut on_refresh: R,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
    R: FnMut(&RefreshSummary),
{
    info!("Snapshot poller starting, interval {:?}", options.interval);

    loop {
        let summary = tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Snapshot poller shutting down...");
                return;
            }
            summary = snapshot.refresh(source) => summary,
        };

        if summary.is_complete() {
            debug!("Snapshot refresh completed");
        } else {
            warn!("Snapshot refresh incomplete: {}", summary.failed.join(", "));
        }
        on_refresh(&summary);

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Snapshot poller shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}

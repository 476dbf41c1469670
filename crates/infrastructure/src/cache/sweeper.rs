//! Periodic cache sweep task

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::MokaCache;

/// Spawn a background task that sweeps `cache` every `interval` until
/// `shutdown` is cancelled.
pub fn spawn_cache_sweeper(
    cache: Arc<MokaCache>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting cache sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!("Cache sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep().await;
                    if removed > 0 {
                        info!(removed, "Purged expired cache entries");
                    }
                }
            }
        }
    })
}

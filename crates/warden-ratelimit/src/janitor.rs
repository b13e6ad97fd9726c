//! Opt-in periodic cleanup for a shared [`RateLimiter`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::limiter::RateLimiter;

/// Spawn a task that calls [`RateLimiter::cleanup`] every `interval`.
///
/// The first sweep runs one full `interval` after spawning. The task runs
/// until the returned handle is aborted or the runtime shuts down. Must be
/// called from within a tokio runtime.
#[must_use]
pub fn spawn_cleanup_task(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    max_age_ms: u64,
) -> JoinHandle<()> {
    let interval = interval.max(Duration::from_millis(1));
    info!(?interval, max_age_ms, "Starting rate-limit cleanup task");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = limiter.cleanup(max_age_ms);
            debug!(evicted, remaining = limiter.key_count(), "Rate-limit sweep");
        }
    })
}

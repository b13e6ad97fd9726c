//! Sliding-window rate limiter keyed by `(session, tool)`.
//!
//! Each key holds the admission timestamps inside its trailing window.
//! Entries that have left the window are pruned lazily on the next check for
//! that key; [`RateLimiter::cleanup`] drops idle keys in bulk.
//!
//! Keys live in a sharded [`DashMap`]. A check holds one shard lock for the
//! duration of a prune-count-append, so admission for a single key is exact
//! under concurrency and unrelated keys do not contend.
//!
//! Exactness is a deliberate guarantee, stronger than eventual consistency:
//! `limit.count` concurrent callers on one key never see more than
//! `limit.count` admissions. `test_concurrent_admission_is_exact` pins it.
//! Do not split the prune, count and append across separate lock
//! acquisitions.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};
use warden_core::{RateLimit, SecurityError, SecurityResult, SessionId};
use warden_events::{EventSink, NoopSink, SecurityEvent};

use crate::clock::{Clock, MonotonicClock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    session_id: SessionId,
    tool: String,
}

impl WindowKey {
    fn new(session_id: &SessionId, tool: &str) -> Self {
        Self {
            session_id: session_id.clone(),
            tool: tool.to_string(),
        }
    }
}

/// Timestamps strictly after `cutoff` survive. No cutoff means nothing has
/// aged out yet.
fn in_window(ts: u64, cutoff: Option<u64>) -> bool {
    cutoff.is_none_or(|c| ts > c)
}

/// Per-session, per-tool sliding-window limiter.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_core::SessionId;
/// use warden_events::NoopSink;
/// use warden_ratelimit::{ManualClock, RateLimiter};
///
/// let clock = Arc::new(ManualClock::new(0));
/// let limiter = RateLimiter::new(clock.clone(), Arc::new(NoopSink));
/// let session = SessionId::from("s1");
///
/// assert!(limiter.check_rate(&session, "bash", 1, 1_000).is_ok());
/// assert!(limiter.check_rate(&session, "bash", 1, 1_000).is_err());
///
/// clock.advance(1_001);
/// assert!(limiter.check_rate(&session, "bash", 1, 1_000).is_ok());
/// ```
pub struct RateLimiter {
    windows: DashMap<WindowKey, Vec<u64>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl RateLimiter {
    /// Create a limiter reading time from `clock` and reporting hits to `sink`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
            sink,
        }
    }

    /// Limiter on a [`MonotonicClock`] with events discarded.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(MonotonicClock::new()), Arc::new(NoopSink))
    }

    /// The clock this limiter reads.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Admit or refuse one invocation of `tool` by `session_id`.
    ///
    /// An admitted call is counted against the window. A refused call leaves
    /// the stored window untouched. A `limit` of zero refuses everything.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::RateLimited`] with the milliseconds until the
    /// oldest counted invocation leaves the window (at least 1).
    pub fn check_rate(
        &self,
        session_id: &SessionId,
        tool: &str,
        limit: u32,
        window_ms: u64,
    ) -> SecurityResult<()> {
        let now = self.clock.now_ms();

        if limit == 0 {
            return Err(self.refuse(session_id, tool, limit, window_ms, window_ms.max(1)));
        }

        let cutoff = now.checked_sub(window_ms);
        let max = usize::try_from(limit).unwrap_or(usize::MAX);

        let oldest = {
            let mut entry = self
                .windows
                .entry(WindowKey::new(session_id, tool))
                .or_default();
            let survivors: Vec<u64> = entry
                .iter()
                .copied()
                .filter(|ts| in_window(*ts, cutoff))
                .collect();

            if survivors.len() < max {
                let mut survivors = survivors;
                survivors.push(now);
                *entry = survivors;
                None
            } else {
                Some(survivors.iter().copied().min().unwrap_or(now))
            }
        };

        match oldest {
            None => {
                debug!(session_id = %session_id, %tool, limit, window_ms, "Invocation admitted");
                Ok(())
            },
            Some(oldest) => {
                let retry_after_ms = oldest.saturating_add(window_ms).saturating_sub(now).max(1);
                Err(self.refuse(session_id, tool, limit, window_ms, retry_after_ms))
            },
        }
    }

    /// [`check_rate`](Self::check_rate) with a [`RateLimit`] pair.
    ///
    /// # Errors
    ///
    /// Same as [`check_rate`](Self::check_rate).
    pub fn check(&self, session_id: &SessionId, tool: &str, limit: RateLimit) -> SecurityResult<()> {
        self.check_rate(session_id, tool, limit.count, limit.window_ms)
    }

    /// Invocations counted in the trailing `window_ms` for this key.
    #[must_use]
    pub fn get_count(&self, session_id: &SessionId, tool: &str, window_ms: u64) -> usize {
        let cutoff = self.clock.now_ms().checked_sub(window_ms);
        self.windows
            .get(&WindowKey::new(session_id, tool))
            .map_or(0, |entry| {
                entry.iter().filter(|ts| in_window(**ts, cutoff)).count()
            })
    }

    /// Forget every window belonging to `session_id`.
    pub fn clear_session(&self, session_id: &SessionId) {
        self.windows.retain(|key, _| key.session_id != *session_id);
        debug!(session_id = %session_id, "Cleared rate-limit windows for session");
    }

    /// Forget every window.
    pub fn clear_all(&self) {
        self.windows.clear();
        debug!("Cleared all rate-limit windows");
    }

    /// Drop timestamps older than `max_age_ms` and remove keys left empty.
    ///
    /// Returns the number of keys removed. The limiter never calls this on
    /// its own.
    pub fn cleanup(&self, max_age_ms: u64) -> usize {
        let cutoff = self.clock.now_ms().checked_sub(max_age_ms);
        let mut evicted: usize = 0;

        self.windows.retain(|_, timestamps| {
            timestamps.retain(|ts| in_window(*ts, cutoff));
            if timestamps.is_empty() {
                evicted = evicted.saturating_add(1);
                false
            } else {
                true
            }
        });

        if evicted > 0 {
            debug!(evicted, max_age_ms, "Rate-limit cleanup removed idle keys");
        }
        evicted
    }

    /// Number of `(session, tool)` keys currently tracked.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.windows.len()
    }

    fn refuse(
        &self,
        session_id: &SessionId,
        tool: &str,
        limit: u32,
        window_ms: u64,
        retry_after_ms: u64,
    ) -> SecurityError {
        warn!(
            session_id = %session_id,
            %tool,
            limit,
            window_ms,
            retry_after_ms,
            "Rate limit exceeded"
        );
        self.sink.emit(SecurityEvent::RateLimited {
            session_id: session_id.clone(),
            tool: tool.to_string(),
            limit,
            window_ms,
            retry_after_ms,
        });
        SecurityError::RateLimited { retry_after_ms }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("keys", &self.windows.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use warden_test::RecordingSink;

    fn limiter() -> (RateLimiter, Arc<ManualClock>, Arc<RecordingSink>) {
        let clock = Arc::new(ManualClock::new(0));
        let sink = Arc::new(RecordingSink::new());
        let limiter = RateLimiter::new(clock.clone(), sink.clone());
        (limiter, clock, sink)
    }

    fn session() -> SessionId {
        SessionId::from("session-a")
    }

    // ------------------------------------------------------------------------
    // Admission
    // ------------------------------------------------------------------------

    #[test]
    fn test_limit_then_window_slides() {
        let (limiter, clock, _) = limiter();
        let s = session();

        for _ in 0..3 {
            assert!(limiter.check_rate(&s, "grep", 3, 1_000).is_ok());
        }
        assert!(matches!(
            limiter.check_rate(&s, "grep", 3, 1_000),
            Err(SecurityError::RateLimited { .. })
        ));

        clock.set(1_001);
        assert!(limiter.check_rate(&s, "grep", 3, 1_000).is_ok());
    }

    #[test]
    fn test_retry_after_tracks_oldest_entry() {
        let (limiter, clock, _) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "bash", 2, 1_000).is_ok());
        clock.set(200);
        assert!(limiter.check_rate(&s, "bash", 2, 1_000).is_ok());

        clock.set(600);
        let err = limiter.check_rate(&s, "bash", 2, 1_000).unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(400));
    }

    #[test]
    fn test_retry_after_clamped_to_one() {
        let (limiter, clock, _) = limiter();
        let s = session();

        clock.set(5_000);
        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_ok());
        clock.set(5_999);
        let err = limiter.check_rate(&s, "bash", 1, 1_000).unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(1));
    }

    #[test]
    fn test_entries_kept_before_first_full_window() {
        let (limiter, clock, _) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_ok());
        clock.set(999);
        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_err());
        assert_eq!(limiter.get_count(&s, "bash", 1_000), 1);
    }

    #[test]
    fn test_entry_at_exact_boundary_expires() {
        let (limiter, clock, _) = limiter();
        let s = session();

        clock.set(100);
        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_ok());
        clock.set(1_100);
        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_ok());
    }

    #[test]
    fn test_denial_does_not_mutate_window() {
        let (limiter, clock, _) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "edit_file", 2, 1_000).is_ok());
        assert!(limiter.check_rate(&s, "edit_file", 2, 1_000).is_ok());
        for _ in 0..5 {
            assert!(limiter.check_rate(&s, "edit_file", 2, 1_000).is_err());
        }
        assert_eq!(limiter.get_count(&s, "edit_file", 1_000), 2);

        clock.set(1_001);
        assert!(limiter.check_rate(&s, "edit_file", 2, 1_000).is_ok());
        assert_eq!(limiter.get_count(&s, "edit_file", 1_000), 1);
    }

    #[test]
    fn test_zero_limit_always_denies() {
        let (limiter, _, _) = limiter();
        let s = session();

        let err = limiter.check_rate(&s, "sudo", 0, 5_000).unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(5_000));
        let err = limiter.check_rate(&s, "sudo", 0, 0).unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(1));
        assert_eq!(limiter.key_count(), 0);
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _, _) = limiter();
        let a = SessionId::from("a");
        let b = SessionId::from("b");

        assert!(limiter.check_rate(&a, "bash", 1, 1_000).is_ok());
        assert!(limiter.check_rate(&a, "bash", 1, 1_000).is_err());
        assert!(limiter.check_rate(&a, "grep", 1, 1_000).is_ok());
        assert!(limiter.check_rate(&b, "bash", 1, 1_000).is_ok());
        assert_eq!(limiter.key_count(), 3);
    }

    #[test]
    fn test_check_with_rate_limit_pair() {
        let (limiter, _, _) = limiter();
        let s = session();
        let limit = RateLimit::new(1, 60_000);

        assert!(limiter.check(&s, "git_push", limit).is_ok());
        assert!(limiter.check(&s, "git_push", limit).is_err());
    }

    #[test]
    fn test_denial_emits_event() {
        let (limiter, _, sink) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_ok());
        assert!(sink.is_empty());
        assert!(limiter.check_rate(&s, "bash", 1, 1_000).is_err());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SecurityEvent::RateLimited {
                session_id: s,
                tool: "bash".to_string(),
                limit: 1,
                window_ms: 1_000,
                retry_after_ms: 1_000,
            }
        );
    }

    // ------------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------------

    #[test]
    fn test_clear_session() {
        let (limiter, _, _) = limiter();
        let a = SessionId::from("a");
        let b = SessionId::from("b");

        assert!(limiter.check_rate(&a, "bash", 5, 1_000).is_ok());
        assert!(limiter.check_rate(&a, "grep", 5, 1_000).is_ok());
        assert!(limiter.check_rate(&b, "bash", 5, 1_000).is_ok());

        limiter.clear_session(&a);
        assert_eq!(limiter.key_count(), 1);
        assert_eq!(limiter.get_count(&a, "bash", 1_000), 0);
        assert_eq!(limiter.get_count(&b, "bash", 1_000), 1);

        limiter.clear_all();
        assert_eq!(limiter.key_count(), 0);
    }

    #[test]
    fn test_cleanup_evicts_idle_keys() {
        let (limiter, clock, _) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "old", 5, 1_000).is_ok());
        clock.set(10_000);
        assert!(limiter.check_rate(&s, "fresh", 5, 1_000).is_ok());

        assert_eq!(limiter.cleanup(5_000), 1);
        assert_eq!(limiter.key_count(), 1);
        assert_eq!(limiter.get_count(&s, "fresh", 1_000), 1);
    }

    #[test]
    fn test_cleanup_before_max_age_keeps_everything() {
        let (limiter, clock, _) = limiter();
        let s = session();

        assert!(limiter.check_rate(&s, "bash", 5, 1_000).is_ok());
        clock.set(100);
        assert_eq!(limiter.cleanup(300_000), 0);
        assert_eq!(limiter.key_count(), 1);
    }

    #[test]
    fn test_concurrent_admission_is_exact() {
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(ManualClock::new(0)),
            Arc::new(NoopSink),
        ));
        let s = session();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let s = s.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|_| limiter.check_rate(&s, "bash", 50, 60_000).is_ok())
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }
}

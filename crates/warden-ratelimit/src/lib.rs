//! Warden Rate Limit - Sliding-window limits per session and tool.
//!
//! [`RateLimiter::check_rate`] admits at most `limit` invocations of a tool
//! per session within any trailing `window_ms`. Time comes from an injected
//! [`Clock`], so tests drive windows with a [`ManualClock`] instead of
//! sleeping.
//!
//! Stale keys are removed by [`RateLimiter::cleanup`], either from an external
//! scheduler or from the opt-in task started by [`spawn_cleanup_task`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod clock;
mod janitor;
mod limiter;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use janitor::spawn_cleanup_task;
pub use limiter::RateLimiter;

//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_ratelimit::prelude::*;` to import all essential types.

pub use crate::{Clock, ManualClock, MonotonicClock, RateLimiter, spawn_cleanup_task};

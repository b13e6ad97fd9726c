//! Warden Permissions - Tier-based authorization for tool invocations.
//!
//! This crate provides:
//! - [`ToolTierRegistry`] mapping tool names to the tier they require
//! - [`PermissionEngine`] deciding whether a session may invoke a tool
//! - Monotonic tier grants and per-tool consent bookkeeping
//! - Per-tier default rate limits ([`RateLimitTable`])
//!
//! # Example
//!
//! ```
//! use warden_core::{ConsentSet, SecurityError, SecurityTier};
//! use warden_permissions::{PermissionEngine, record_consent};
//!
//! let engine = PermissionEngine::with_defaults();
//! let consented = ConsentSet::new();
//!
//! let denied = engine.check_permission("run_command", SecurityTier::Write, &consented);
//! assert!(matches!(denied, Err(SecurityError::PermissionDenied { .. })));
//!
//! let consented = record_consent(&consented, "run_command").unwrap();
//! assert!(engine.check_permission("run_command", SecurityTier::Write, &consented).is_ok());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod engine;
mod grant;
mod limits;
mod registry;

pub use engine::PermissionEngine;
pub use grant::{grant_tier, grant_tier_named, record_consent, revoke_consent};
pub use limits::{RateLimitTable, default_rate_limit};
pub use registry::{DEFAULT_TOOL_TIERS, ToolTierRegistry, ToolTierRegistryBuilder};

//! Warden Core - Shared types for the tool invocation control plane.
//!
//! This crate provides:
//! - The four-level [`SecurityTier`] hierarchy and fail-closed tier checks
//! - Handler security declarations ([`HandlerSecurityProperties`], [`RateLimit`])
//! - Session-owned grant state ([`SessionGrant`], [`ConsentSet`])
//! - The [`SecurityError`] taxonomy shared by every component
//!
//! # Example
//!
//! ```
//! use warden_core::{SecurityTier, SessionGrant};
//! use warden_core::tier::is_allowed;
//!
//! let grant = SessionGrant::new(SecurityTier::Write).with_consent("run_command");
//! assert!(grant.granted_tier.allows(SecurityTier::ReadOnly));
//! assert!(grant.has_consented("run_command"));
//!
//! // Untyped tier names never fail open.
//! assert!(!is_allowed("root", "privileged"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod grant;
pub mod properties;
pub mod tier;
pub mod types;

pub use error::{SecurityError, SecurityResult};
pub use grant::{ConsentSet, SessionGrant};
pub use properties::{HandlerSecurityProperties, RateLimit};
pub use tier::{SecurityTier, is_allowed, is_valid_tier, tier_index};
pub use types::{InvocationStatus, SessionId, Timestamp};

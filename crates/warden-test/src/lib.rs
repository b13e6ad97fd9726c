//! Warden Test - shared test utilities for the Warden control plane.
//!
//! Mocks and fixtures used across the workspace as a dev-dependency.
//!
//! ```toml
//! [dev-dependencies]
//! warden-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_core::{ConsentSet, SecurityTier};
//! use warden_permissions::{PermissionEngine, ToolTierRegistry};
//! use warden_test::RecordingSink;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let engine = PermissionEngine::new(Arc::new(ToolTierRegistry::new()), sink.clone());
//! let _ = engine.check_permission("bash", SecurityTier::ReadOnly, &ConsentSet::new());
//! assert_eq!(sink.of_type("permission_denied").len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

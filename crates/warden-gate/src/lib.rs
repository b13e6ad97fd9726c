//! Warden Gate - start-up wiring for the tool invocation control plane.
//!
//! The control-plane crates are independent. This crate assembles them:
//! it turns a loaded [`Config`](warden_config::Config) into a
//! [`ControlPlane`] holding one permission engine, rate limiter, audit log,
//! and handler registry, and offers [`ControlPlane::preflight`] for
//! executors that want every pre-execution check in one call.
//!
//! The executor still owns the pipeline:
//!
//! 1. [`ControlPlane::preflight`] (tier, consent, rate, handler validation)
//! 2. `handler.execute` and `handler.sanitize_output`
//! 3. [`ControlPlane::record`] with the outcome
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden_events::TracingSink;
//!
//! let plane = warden_gate::bootstrap(None, Arc::new(TracingSink)).unwrap();
//! let _janitor = plane.spawn_maintenance();
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod config_bridge;
mod error;
mod plane;

use std::path::Path;
use std::sync::Arc;

use warden_config::Config;
use warden_events::EventSink;

pub use error::{GateError, GateResult};
pub use plane::{ControlPlane, ControlPlaneBuilder};

/// Load configuration, install logging, and build the plane.
///
/// `explicit` is an optional config file layered over the user file (see
/// [`Config::load`]). The plane has no handlers; callers that register
/// handlers load the config themselves and use
/// [`ControlPlane::builder_from_config`].
///
/// # Errors
///
/// - [`GateError::Config`] if configuration fails to load or validate
/// - [`GateError::Telemetry`] if a global subscriber is already installed
pub fn bootstrap(explicit: Option<&Path>, sink: Arc<dyn EventSink>) -> GateResult<ControlPlane> {
    let config = Config::load(explicit)?;
    let log_config = config_bridge::to_log_config(&config)?;
    warden_telemetry::setup_logging(&log_config)?;
    ControlPlane::from_config(&config, sink)
}

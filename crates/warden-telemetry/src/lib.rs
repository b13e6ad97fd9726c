//! Logging setup for the Warden control plane.
//!
//! The control-plane crates only emit `tracing` events. This crate installs
//! the process-wide subscriber that renders them: an [`EnvFilter`] built
//! from a base level plus per-crate directives, and a `fmt` layer in one of
//! four formats writing to stdout, stderr, or a rolling file.
//!
//! ```rust,no_run
//! use warden_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("warden_ratelimit=debug");
//! setup_logging(&config).unwrap();
//! ```
//!
//! [`EnvFilter`]: tracing_subscriber::EnvFilter

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};

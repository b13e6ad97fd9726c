//! Prelude module - commonly used types for convenient import.
//!
//! ```rust
//! use warden_telemetry::prelude::*;
//! ```

pub use crate::{
    FileRotation, LogConfig, LogFormat, LogTarget, TelemetryError, TelemetryResult,
    setup_logging,
};

//! Gate error types.

use thiserror::Error;
use warden_config::ConfigError;
use warden_core::SecurityError;
use warden_telemetry::TelemetryError;

/// Errors raised while assembling the control plane.
///
/// Per-invocation checks return [`SecurityError`] directly; this type covers
/// start-up, where configuration, logging, and handler registration can fail.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// A handler failed registration.
    #[error("Security error: {0}")]
    Security(#[from] SecurityError),
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

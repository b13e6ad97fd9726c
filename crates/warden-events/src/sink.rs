//! Telemetry sinks.

use tracing::{info, warn};

use crate::event::SecurityEvent;

/// Destination for security events.
///
/// Emission is fire-and-forget: implementations must not block the caller and
/// must not fail. A sink that cannot deliver an event drops it.
pub trait EventSink: Send + Sync {
    /// Deliver an event.
    fn emit(&self, event: SecurityEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: SecurityEvent) {}
}

/// Sink that writes each event as a structured tracing record.
///
/// Denials are logged at `warn`, audit records at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SecurityEvent) {
        match event {
            SecurityEvent::PermissionDenied {
                tool,
                required_tier,
                granted_tier,
            } => {
                warn!(
                    event_type = "permission_denied",
                    %tool,
                    %required_tier,
                    %granted_tier,
                    "Tool invocation denied"
                );
            },
            SecurityEvent::RateLimited {
                session_id,
                tool,
                limit,
                window_ms,
                retry_after_ms,
            } => {
                warn!(
                    event_type = "rate_limited",
                    %session_id,
                    %tool,
                    limit,
                    window_ms,
                    retry_after_ms,
                    "Tool invocation rate limited"
                );
            },
            SecurityEvent::Audit {
                session_id,
                tool,
                status,
                duration_micros,
                entry_id,
            } => {
                info!(
                    event_type = "audit",
                    %session_id,
                    %tool,
                    %status,
                    duration_micros,
                    entry_id,
                    "Tool invocation recorded"
                );
            },
        }
    }
}

//! Security telemetry events.
//!
//! Events identify what happened and to which session/tool. They never carry
//! invocation arguments or results.

use serde::{Deserialize, Serialize};
use warden_core::{InvocationStatus, SecurityTier, SessionId};

/// A fire-and-forget event emitted by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecurityEvent {
    /// A tier check refused an invocation.
    PermissionDenied {
        /// Tool that was denied.
        tool: String,
        /// Tier the tool requires.
        required_tier: SecurityTier,
        /// Tier the session holds.
        granted_tier: SecurityTier,
    },

    /// The sliding-window limiter refused an invocation.
    RateLimited {
        /// Session that hit the limit.
        session_id: SessionId,
        /// Tool that was limited.
        tool: String,
        /// Invocations admitted per window.
        limit: u32,
        /// Window length in milliseconds.
        window_ms: u64,
        /// Backoff hint returned to the caller.
        retry_after_ms: u64,
    },

    /// An invocation was recorded in the audit log.
    Audit {
        /// Session that invoked the tool.
        session_id: SessionId,
        /// Tool that was invoked.
        tool: String,
        /// Recorded outcome.
        status: InvocationStatus,
        /// Execution time in microseconds.
        duration_micros: u64,
        /// Audit entry ID assigned to the record.
        entry_id: u64,
    },
}

impl SecurityEvent {
    /// Stable snake_case event name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "permission_denied",
            Self::RateLimited { .. } => "rate_limited",
            Self::Audit { .. } => "audit",
        }
    }

    /// Tool the event concerns.
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::PermissionDenied { tool, .. }
            | Self::RateLimited { tool, .. }
            | Self::Audit { tool, .. } => tool,
        }
    }

    /// Session the event concerns, if the event carries one.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::PermissionDenied { .. } => None,
            Self::RateLimited { session_id, .. } | Self::Audit { session_id, .. } => {
                Some(session_id)
            },
        }
    }
}

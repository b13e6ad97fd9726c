//! Audit entry type.

use serde::{Deserialize, Serialize};
use warden_core::{InvocationStatus, SessionId, Timestamp};

/// One recorded tool invocation.
///
/// Entries never hold invocation arguments, only a truncated digest of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Process-wide, strictly increasing identifier. Never reused.
    pub id: u64,
    /// When the entry was recorded.
    pub timestamp: Timestamp,
    /// Session that invoked the tool.
    pub session_id: SessionId,
    /// Tool that was invoked.
    pub tool: String,
    /// Outcome of the invocation.
    pub status: InvocationStatus,
    /// Execution time in microseconds.
    pub duration_micros: u64,
    /// 128-bit hex digest of the canonical arguments, if any were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_hash: Option<String>,
}

impl AuditEntry {
    /// Whether the invocation was refused before execution.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.status == InvocationStatus::Blocked
    }
}

//! Audit log queries.

use serde::{Deserialize, Serialize};
use warden_core::{InvocationStatus, SessionId};

use crate::entry::AuditEntry;

/// Default number of entries returned by a query.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Order of query results by entry ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Highest ID first.
    #[default]
    NewestFirst,
    /// Lowest ID first.
    OldestFirst,
}

/// Filter, order, and limit for [`AuditLog::get_audit_log`](crate::AuditLog::get_audit_log).
///
/// # Example
///
/// ```
/// use warden_audit::{AuditQuery, SortOrder};
/// use warden_core::{InvocationStatus, SessionId};
///
/// let query = AuditQuery::new()
///     .for_session(SessionId::from("s1"))
///     .with_status(InvocationStatus::Blocked)
///     .limit(10)
///     .order(SortOrder::OldestFirst);
/// assert_eq!(query.limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Only entries for this session.
    pub session_id: Option<SessionId>,
    /// Only entries with this status.
    pub status: Option<InvocationStatus>,
    /// Maximum entries returned.
    pub limit: usize,
    /// Result order.
    pub order: SortOrder,
}

impl AuditQuery {
    /// Query for the newest [`DEFAULT_QUERY_LIMIT`] entries of any session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: None,
            status: None,
            limit: DEFAULT_QUERY_LIMIT,
            order: SortOrder::NewestFirst,
        }
    }

    /// Restrict to one session.
    #[must_use]
    pub fn for_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Restrict to one status.
    #[must_use]
    pub fn with_status(mut self, status: InvocationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the result order.
    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub(crate) fn matches(&self, entry: &AuditEntry) -> bool {
        self.session_id
            .as_ref()
            .is_none_or(|s| *s == entry.session_id)
            && self.status.is_none_or(|s| s == entry.status)
    }
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self::new()
    }
}

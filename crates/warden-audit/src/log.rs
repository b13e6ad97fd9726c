//! In-memory audit log with a bounded, id-ordered buffer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, warn};
use warden_core::{InvocationStatus, SessionId, Timestamp};
use warden_events::{EventSink, NoopSink, SecurityEvent};

use crate::entry::AuditEntry;
use crate::hash::hash_args;
use crate::query::{AuditQuery, SortOrder};

/// Default number of entries retained.
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// Append-only log of tool invocations.
///
/// IDs come from an atomic counter and are never reused, even after the
/// entry is evicted. The buffer keeps at most `buffer_size` entries; when it
/// overflows the entries with the smallest IDs go first.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden_audit::{AuditLog, AuditQuery};
/// use warden_core::{InvocationStatus, SessionId};
///
/// let log = AuditLog::with_defaults();
/// let session = SessionId::from("s1");
///
/// let id = log.log_invocation(&session, "read_file", InvocationStatus::Ok, 120, Some(&json!({"path": "a.txt"})));
/// assert_eq!(id, 1);
///
/// let entries = log.get_audit_log(&AuditQuery::new().for_session(session));
/// assert_eq!(entries.len(), 1);
/// assert!(entries[0].args_hash.is_some());
/// ```
pub struct AuditLog {
    entries: RwLock<BTreeMap<u64, AuditEntry>>,
    next_id: AtomicU64,
    buffer_size: usize,
    sink: Arc<dyn EventSink>,
}

impl AuditLog {
    /// Create a log retaining `buffer_size` entries (at least one).
    #[must_use]
    pub fn new(buffer_size: usize, sink: Arc<dyn EventSink>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            buffer_size: buffer_size.max(1),
            sink,
        }
    }

    /// Log with [`DEFAULT_BUFFER_SIZE`] and events discarded.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, Arc::new(NoopSink))
    }

    /// Record one invocation and return its ID.
    ///
    /// Only a digest of `args` is stored. Blocked invocations are also logged
    /// as warnings carrying that digest.
    pub fn log_invocation(
        &self,
        session_id: &SessionId,
        tool: &str,
        status: InvocationStatus,
        duration_micros: u64,
        args: Option<&Value>,
    ) -> u64 {
        let args_hash = args.map(hash_args);
        let timestamp = Timestamp::now();

        // The ID is taken under the write lock so a concurrent `clear_all`
        // cannot restart the counter between allocation and insert.
        let id = {
            let mut entries = self.write();
            let id = self.next_id.fetch_add(1, Ordering::SeqCst).saturating_add(1);
            entries.insert(
                id,
                AuditEntry {
                    id,
                    timestamp,
                    session_id: session_id.clone(),
                    tool: tool.to_string(),
                    status,
                    duration_micros,
                    args_hash: args_hash.clone(),
                },
            );
            while entries.len() > self.buffer_size {
                if entries.pop_first().is_none() {
                    break;
                }
            }
            id
        };

        if status == InvocationStatus::Blocked {
            warn!(
                entry_id = id,
                session_id = %session_id,
                %tool,
                args_hash = args_hash.as_deref().unwrap_or("-"),
                "Blocked tool invocation"
            );
        }

        self.sink.emit(SecurityEvent::Audit {
            session_id: session_id.clone(),
            tool: tool.to_string(),
            status,
            duration_micros,
            entry_id: id,
        });

        id
    }

    /// Entries matching `query`, ordered by ID and truncated to its limit.
    #[must_use]
    pub fn get_audit_log(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let entries = self.read();
        let matching = |entry: &&AuditEntry| query.matches(entry);
        match query.order {
            SortOrder::NewestFirst => entries
                .values()
                .rev()
                .filter(matching)
                .take(query.limit)
                .cloned()
                .collect(),
            SortOrder::OldestFirst => entries
                .values()
                .filter(matching)
                .take(query.limit)
                .cloned()
                .collect(),
        }
    }

    /// Entry with the given ID, if it is still buffered.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<AuditEntry> {
        self.read().get(&id).cloned()
    }

    /// Drop all entries for `session_id` and return how many were removed.
    ///
    /// The ID counter is not affected.
    pub fn clear_session(&self, session_id: &SessionId) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.session_id != *session_id);
        let removed = before.saturating_sub(entries.len());
        debug!(session_id = %session_id, removed, "Cleared audit entries for session");
        removed
    }

    /// Drop every entry and restart IDs at 1.
    ///
    /// The counter is reset while the buffer is locked, so an invocation
    /// logged concurrently lands either before the clear (and is dropped) or
    /// after it (with a restarted ID). Intended for tests.
    pub fn clear_all(&self) {
        let mut entries = self.write();
        entries.clear();
        self.next_id.store(0, Ordering::SeqCst);
        debug!("Cleared audit log");
    }

    /// Number of buffered entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Whether no entries are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Maximum number of buffered entries.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, AuditEntry>> {
        self.entries.read().unwrap_or_else(|e| {
            warn!("Audit buffer lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, AuditEntry>> {
        self.entries.write().unwrap_or_else(|e| {
            warn!("Audit buffer lock poisoned, recovering");
            e.into_inner()
        })
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog")
            .field("count", &self.count())
            .field("buffer_size", &self.buffer_size)
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

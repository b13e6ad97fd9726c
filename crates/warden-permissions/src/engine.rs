//! Permission checks against the tool tier registry.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use warden_core::{ConsentSet, SecurityError, SecurityResult, SecurityTier, SessionGrant};
use warden_events::{EventSink, NoopSink, SecurityEvent};

use crate::registry::ToolTierRegistry;

/// Decides whether a session may invoke a tool.
///
/// The engine holds no session state. The caller passes the session's granted
/// tier and consent set on every check.
///
/// # Example
///
/// ```
/// use warden_core::{ConsentSet, SecurityTier};
/// use warden_permissions::PermissionEngine;
///
/// let engine = PermissionEngine::with_defaults();
/// let consented = ConsentSet::new();
///
/// assert!(engine.check_permission("read_file", SecurityTier::ReadOnly, &consented).is_ok());
/// assert!(engine.check_permission("bash", SecurityTier::Write, &consented).is_err());
/// ```
#[derive(Clone)]
pub struct PermissionEngine {
    registry: Arc<ToolTierRegistry>,
    sink: Arc<dyn EventSink>,
}

impl PermissionEngine {
    /// Create an engine over `registry`, reporting denials to `sink`.
    #[must_use]
    pub fn new(registry: Arc<ToolTierRegistry>, sink: Arc<dyn EventSink>) -> Self {
        Self { registry, sink }
    }

    /// Engine over the default registry with events discarded.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ToolTierRegistry::new()), Arc::new(NoopSink))
    }

    /// The registry this engine consults.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolTierRegistry> {
        &self.registry
    }

    /// Tier required to invoke `tool`. Unknown tools get the registry fallback.
    #[must_use]
    pub fn resolve_tier(&self, tool: &str) -> SecurityTier {
        self.registry.resolve(tool)
    }

    /// Check whether a session holding `granted_tier` may invoke `tool`.
    ///
    /// Consent for the specific tool overrides the tier check.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::PermissionDenied`] when the tool is not
    /// consented and its tier exceeds `granted_tier`.
    pub fn check_permission(
        &self,
        tool: &str,
        granted_tier: SecurityTier,
        consented_tools: &ConsentSet,
    ) -> SecurityResult<()> {
        if consented_tools.contains(tool) {
            debug!(%tool, "Tool permitted by explicit consent");
            return Ok(());
        }

        let required_tier = self.resolve_tier(tool);
        if granted_tier.allows(required_tier) {
            return Ok(());
        }

        warn!(
            %tool,
            %required_tier,
            %granted_tier,
            "Permission denied: insufficient tier"
        );
        self.sink.emit(SecurityEvent::PermissionDenied {
            tool: tool.to_string(),
            required_tier,
            granted_tier,
        });

        Err(SecurityError::PermissionDenied {
            tool: tool.to_string(),
            required_tier,
            granted_tier,
        })
    }

    /// [`check_permission`](Self::check_permission) using a [`SessionGrant`].
    ///
    /// # Errors
    ///
    /// Same as [`check_permission`](Self::check_permission).
    pub fn check_grant(&self, tool: &str, grant: &SessionGrant) -> SecurityResult<()> {
        self.check_permission(tool, grant.granted_tier, &grant.consented_tools)
    }
}

impl fmt::Debug for PermissionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionEngine")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

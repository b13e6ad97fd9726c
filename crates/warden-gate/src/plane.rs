//! The assembled control plane.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use warden_audit::AuditLog;
use warden_config::{Config, MaintenanceSection};
use warden_core::{
    InvocationStatus, RateLimit, SecurityError, SecurityResult, SecurityTier, SessionGrant,
    SessionId,
};
use warden_events::{EventSink, NoopSink};
use warden_handler::{HandlerRegistry, InvocationContext, ToolHandler};
use warden_permissions::{PermissionEngine, RateLimitTable, ToolTierRegistryBuilder};
use warden_ratelimit::{Clock, MonotonicClock, RateLimiter, spawn_cleanup_task};

use crate::config_bridge;
use crate::error::GateResult;

/// Permission engine, rate limiter, audit log, and handler registry built
/// once at start-up and shared by every invocation.
///
/// Cloning is cheap; all stores sit behind `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_config::Config;
/// use warden_core::{InvocationStatus, SessionGrant, SessionId, SecurityTier};
/// use warden_events::NoopSink;
/// use warden_gate::ControlPlane;
///
/// let plane = ControlPlane::from_config(&Config::default(), Arc::new(NoopSink)).unwrap();
/// let session = SessionId::from("s1");
/// let grant = SessionGrant::new(SecurityTier::Write);
///
/// assert!(plane.check(&session, &grant, "edit_file").is_ok());
/// assert!(plane.check(&session, &grant, "run_command").is_err());
///
/// let id = plane.record(&session, "edit_file", InvocationStatus::Ok, 1_250, None);
/// assert_eq!(id, 1);
/// ```
#[derive(Clone)]
pub struct ControlPlane {
    permissions: PermissionEngine,
    limiter: Arc<RateLimiter>,
    audit: Arc<AuditLog>,
    handlers: Arc<HandlerRegistry>,
    limits: RateLimitTable,
    maintenance: MaintenanceSection,
}

impl ControlPlane {
    /// Start building a plane with default settings.
    #[must_use]
    pub fn builder() -> ControlPlaneBuilder {
        ControlPlaneBuilder::new()
    }

    /// Builder pre-populated from `config`.
    #[must_use]
    pub fn builder_from_config(config: &Config) -> ControlPlaneBuilder {
        ControlPlaneBuilder {
            tiers: config_bridge::to_registry_builder(config),
            overrides: config_bridge::to_tool_overrides(config),
            limits: config_bridge::to_rate_limit_table(config),
            audit_buffer_size: config.audit.buffer_size,
            maintenance: config.maintenance.clone(),
            ..ControlPlaneBuilder::new()
        }
    }

    /// Build a plane from `config` with no registered handlers.
    ///
    /// # Errors
    ///
    /// Propagates [`ControlPlaneBuilder::build`] errors.
    pub fn from_config(config: &Config, sink: Arc<dyn EventSink>) -> GateResult<Self> {
        Self::builder_from_config(config).sink(sink).build()
    }

    /// The permission engine.
    #[must_use]
    pub fn permissions(&self) -> &PermissionEngine {
        &self.permissions
    }

    /// The shared rate limiter.
    #[must_use]
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The shared audit log.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// Registered handlers.
    #[must_use]
    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    /// Per-tier default rate limits.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimitTable {
        &self.limits
    }

    /// Tier required to invoke `tool`.
    #[must_use]
    pub fn resolve_tier(&self, tool: &str) -> SecurityTier {
        self.permissions.resolve_tier(tool)
    }

    /// Limit applied to `tool`: its handler's declaration, else the table
    /// entry for the tool's resolved tier.
    #[must_use]
    pub fn effective_rate_limit(&self, tool: &str) -> RateLimit {
        match self.handlers.properties(tool) {
            Some(properties) => self.limits.effective_rate_limit(properties),
            None => self.limits.get(self.resolve_tier(tool)),
        }
    }

    /// Permission, consent, and rate checks for one invocation, without the
    /// handler's own validation.
    ///
    /// An admitted call is counted against the rate window.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::PermissionDenied`] if the grant does not cover the tool
    /// - [`SecurityError::ConsentRequired`] if the handler demands consent the
    ///   session has not given
    /// - [`SecurityError::RateLimited`] if the window is full
    pub fn check(
        &self,
        session_id: &SessionId,
        grant: &SessionGrant,
        tool: &str,
    ) -> SecurityResult<()> {
        self.permissions.check_grant(tool, grant)?;
        self.check_consent(grant, tool)?;
        self.limiter
            .check(session_id, tool, self.effective_rate_limit(tool))
    }

    /// Everything the plane checks before an executor may run a handler.
    ///
    /// Runs [`check`](Self::check), then the handler's `validate_security`
    /// when one is registered under `ctx.tool`. The handler is never executed.
    ///
    /// # Errors
    ///
    /// Any [`check`](Self::check) error, or
    /// [`SecurityError::HandlerRejected`] carrying the handler's reason.
    pub async fn preflight(
        &self,
        grant: &SessionGrant,
        ctx: &InvocationContext,
        args: &Value,
    ) -> SecurityResult<()> {
        self.check(&ctx.session_id, grant, &ctx.tool)?;

        if let Some(handler) = self.handlers.get(&ctx.tool) {
            handler
                .validate_security(args, ctx)
                .await
                .map_err(|e| {
                    warn!(
                        session_id = %ctx.session_id,
                        tool = %ctx.tool,
                        "Handler rejected invocation"
                    );
                    SecurityError::from(e)
                })?;
        }

        debug!(session_id = %ctx.session_id, tool = %ctx.tool, "Preflight passed");
        Ok(())
    }

    /// Record a finished (or blocked) invocation and return its audit id.
    pub fn record(
        &self,
        session_id: &SessionId,
        tool: &str,
        status: InvocationStatus,
        duration_micros: u64,
        args: Option<&Value>,
    ) -> u64 {
        self.audit
            .log_invocation(session_id, tool, status, duration_micros, args)
    }

    /// Record a refused preflight as [`InvocationStatus::Blocked`].
    ///
    /// Returns `None` for errors that do not block an invocation.
    pub fn record_denial(
        &self,
        session_id: &SessionId,
        tool: &str,
        error: &SecurityError,
        args: Option<&Value>,
    ) -> Option<u64> {
        error
            .is_denial()
            .then(|| self.record(session_id, tool, InvocationStatus::Blocked, 0, args))
    }

    /// Drop all rate-limit and audit state held for `session_id`.
    pub fn end_session(&self, session_id: &SessionId) {
        self.limiter.clear_session(session_id);
        let removed = self.audit.clear_session(session_id);
        debug!(session_id = %session_id, removed, "Session state cleared");
    }

    /// Start the rate-limit cleanup task when `[maintenance]` enables it.
    ///
    /// Must be called from within a tokio runtime. The caller aborts the
    /// handle on shutdown.
    #[must_use]
    pub fn spawn_maintenance(&self) -> Option<JoinHandle<()>> {
        if !self.maintenance.enabled {
            return None;
        }
        Some(spawn_cleanup_task(
            Arc::clone(&self.limiter),
            std::time::Duration::from_secs(self.maintenance.cleanup_interval_secs),
            self.maintenance.max_age_ms,
        ))
    }

    /// Age after which the cleanup task drops rate-limit timestamps.
    ///
    /// Never shorter than the longest window in force, whether it comes from
    /// the tier table or a handler declaration.
    #[must_use]
    pub fn cleanup_max_age_ms(&self) -> u64 {
        self.maintenance.max_age_ms
    }

    fn check_consent(&self, grant: &SessionGrant, tool: &str) -> SecurityResult<()> {
        let required = self
            .handlers
            .properties(tool)
            .is_some_and(warden_core::HandlerSecurityProperties::requires_consent_or_default);
        if required && !grant.has_consented(tool) {
            warn!(%tool, "Consent required before invocation");
            return Err(SecurityError::ConsentRequired {
                tool: tool.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ControlPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlPlane")
            .field("permissions", &self.permissions)
            .field("handlers", &self.handlers)
            .field("limits", &self.limits)
            .field("maintenance", &self.maintenance)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ControlPlane`].
///
/// Tool tiers are layered as: seeded defaults, then each registered
/// handler's declared tier, then explicit overrides.
pub struct ControlPlaneBuilder {
    tiers: ToolTierRegistryBuilder,
    overrides: Vec<(String, SecurityTier)>,
    limits: RateLimitTable,
    audit_buffer_size: usize,
    maintenance: MaintenanceSection,
    handlers: Vec<Arc<dyn ToolHandler>>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl ControlPlaneBuilder {
    /// Builder with default tiers and limits, events discarded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiers: ToolTierRegistryBuilder::default().with_defaults(),
            overrides: Vec::new(),
            limits: RateLimitTable::new(),
            audit_buffer_size: warden_audit::DEFAULT_BUFFER_SIZE,
            maintenance: MaintenanceSection::default(),
            handlers: Vec::new(),
            sink: Arc::new(NoopSink),
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    /// Where denial and audit events go.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Clock for the rate limiter.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the base tool classification.
    #[must_use]
    pub fn tool_tiers(mut self, tiers: ToolTierRegistryBuilder) -> Self {
        self.tiers = tiers;
        self
    }

    /// Classify `tool` at `tier`, overriding handler declarations.
    #[must_use]
    pub fn tool_override(mut self, tool: impl Into<String>, tier: SecurityTier) -> Self {
        self.overrides.push((tool.into(), tier));
        self
    }

    /// Replace the per-tier rate limits.
    #[must_use]
    pub fn rate_limits(mut self, limits: RateLimitTable) -> Self {
        self.limits = limits;
        self
    }

    /// Audit ring buffer capacity.
    #[must_use]
    pub fn audit_buffer_size(mut self, size: usize) -> Self {
        self.audit_buffer_size = size;
        self
    }

    /// Cleanup scheduling used by [`ControlPlane::spawn_maintenance`].
    #[must_use]
    pub fn maintenance(mut self, maintenance: MaintenanceSection) -> Self {
        self.maintenance = maintenance;
        self
    }

    /// Register a handler at build time.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Assemble the plane.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidProperties`] or
    /// [`SecurityError::DuplicateHandler`] if a handler fails registration.
    pub fn build(self) -> GateResult<ControlPlane> {
        let mut handlers = HandlerRegistry::new();
        for handler in self.handlers {
            handlers.register(handler)?;
        }

        let registry = self
            .tiers
            .tools(handlers.declared_tiers())
            .tools(self.overrides)
            .build();

        let mut maintenance = self.maintenance;
        let longest_window = longest_window_ms(&self.limits, &handlers);
        if maintenance.max_age_ms < longest_window {
            warn!(
                configured = maintenance.max_age_ms,
                longest_window, "Raising cleanup max age to the longest rate-limit window"
            );
            maintenance.max_age_ms = longest_window;
        }

        info!(
            tools = registry.len(),
            handlers = handlers.len(),
            fallback = %registry.fallback(),
            audit_buffer_size = self.audit_buffer_size,
            "Control plane initialized"
        );

        Ok(ControlPlane {
            permissions: PermissionEngine::new(Arc::new(registry), Arc::clone(&self.sink)),
            limiter: Arc::new(RateLimiter::new(self.clock, Arc::clone(&self.sink))),
            audit: Arc::new(AuditLog::new(self.audit_buffer_size, self.sink)),
            handlers: Arc::new(handlers),
            limits: self.limits,
            maintenance,
        })
    }
}

fn longest_window_ms(limits: &RateLimitTable, handlers: &HandlerRegistry) -> u64 {
    let table = SecurityTier::hierarchy()
        .into_iter()
        .map(|tier| limits.get(tier).window_ms);
    let declared = handlers
        .names()
        .into_iter()
        .filter_map(|name| handlers.properties(name))
        .filter_map(|properties| properties.rate_limit)
        .map(|limit| limit.window_ms);
    table.chain(declared).max().unwrap_or(0)
}

impl Default for ControlPlaneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ControlPlaneBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlPlaneBuilder")
            .field("overrides", &self.overrides)
            .field("limits", &self.limits)
            .field("audit_buffer_size", &self.audit_buffer_size)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

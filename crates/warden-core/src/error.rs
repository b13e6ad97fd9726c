//! Security decision errors.
//!
//! Every variant is an expected, recoverable outcome. None of them carry
//! invocation arguments.

use thiserror::Error;

use crate::tier::SecurityTier;

/// Errors returned by the control plane's checks and bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// The session's tier does not cover the tool's required tier.
    #[error("permission denied for tool '{tool}': requires {required_tier}, session has {granted_tier}")]
    PermissionDenied {
        /// Tool that was denied.
        tool: String,
        /// Tier the tool requires.
        required_tier: SecurityTier,
        /// Tier the session holds.
        granted_tier: SecurityTier,
    },

    /// The handler demands per-tool consent and the session has not given it.
    #[error("tool '{tool}' requires explicit consent")]
    ConsentRequired {
        /// Tool awaiting consent.
        tool: String,
    },

    /// Too many invocations of this tool in the current window.
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Milliseconds until the oldest counted invocation leaves the window.
        retry_after_ms: u64,
    },

    /// A tier name is not one of the four canonical tiers.
    #[error("invalid security tier: '{value}'")]
    InvalidTier {
        /// The rejected name.
        value: String,
    },

    /// A grant request would lower the session's tier.
    #[error("tier downgrade rejected: {current} -> {requested}")]
    TierDowngrade {
        /// Tier the session currently holds.
        current: SecurityTier,
        /// Lower tier that was requested.
        requested: SecurityTier,
    },

    /// Consent was recorded twice for the same tool.
    #[error("consent already recorded for tool '{tool}'")]
    AlreadyConsented {
        /// Tool name.
        tool: String,
    },

    /// Consent was revoked for a tool that never had it.
    #[error("no consent recorded for tool '{tool}'")]
    NotConsented {
        /// Tool name.
        tool: String,
    },

    /// A handler declared malformed security properties.
    #[error("invalid handler properties: {field}: {reason}")]
    InvalidProperties {
        /// Offending property.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two handlers were registered under the same name.
    #[error("handler already registered: {name}")]
    DuplicateHandler {
        /// Conflicting handler name.
        name: String,
    },

    /// A handler's own pre-execution check refused the invocation.
    #[error("rejected by handler: {reason}")]
    HandlerRejected {
        /// Reason supplied by the handler, passed through unmodified.
        reason: String,
    },
}

impl SecurityError {
    /// Backoff hint for rate-limit errors.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }

    /// Whether this error blocks an invocation (as opposed to a bookkeeping
    /// or registration error).
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::ConsentRequired { .. }
                | Self::RateLimited { .. }
                | Self::HandlerRejected { .. }
        )
    }
}

/// Result type for control plane operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

//! Security properties a tool handler declares about itself.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::tier::SecurityTier;

/// A sliding-window invocation limit: at most `count` calls per `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimit {
    /// Maximum invocations admitted per window.
    pub count: u32,
    /// Window length in milliseconds.
    #[serde(alias = "windowMs")]
    pub window_ms: u64,
}

impl RateLimit {
    /// Create a new rate limit.
    #[must_use]
    pub const fn new(count: u32, window_ms: u64) -> Self {
        Self { count, window_ms }
    }

    /// Shorthand for a limit over a window measured in seconds.
    #[must_use]
    pub const fn per_seconds(count: u32, secs: u64) -> Self {
        Self {
            count,
            window_ms: secs.saturating_mul(1000),
        }
    }

    /// Window length as a [`Duration`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Security properties declared once per tool handler.
///
/// Absent optional fields mean "use the system default for this tier", never
/// "unlimited".
///
/// # Example
///
/// ```
/// use warden_core::{HandlerSecurityProperties, SecurityTier};
///
/// let props = HandlerSecurityProperties::new(SecurityTier::Execute)
///     .with_rate_limit(5, 60_000)
///     .with_timeout_ms(30_000);
///
/// assert_eq!(props.tier, SecurityTier::Execute);
/// assert!(!props.requires_consent_or_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerSecurityProperties {
    /// Tier the tool requires.
    pub tier: SecurityTier,
    /// Per-handler rate limit override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    /// Advisory execution deadline, enforced by the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Whether every session must consent to this tool explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_consent: Option<bool>,
}

impl HandlerSecurityProperties {
    /// Properties with only a tier; everything else uses tier defaults.
    #[must_use]
    pub const fn new(tier: SecurityTier) -> Self {
        Self {
            tier,
            rate_limit: None,
            timeout_ms: None,
            requires_consent: None,
        }
    }

    /// Override the tier's default rate limit.
    #[must_use]
    pub const fn with_rate_limit(mut self, count: u32, window_ms: u64) -> Self {
        self.rate_limit = Some(RateLimit::new(count, window_ms));
        self
    }

    /// Declare an execution timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Declare whether explicit consent is required.
    #[must_use]
    pub const fn with_consent(mut self, requires_consent: bool) -> Self {
        self.requires_consent = Some(requires_consent);
        self
    }

    /// Declared timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Consent requirement, defaulting to `false` when undeclared.
    #[must_use]
    pub fn requires_consent_or_default(&self) -> bool {
        self.requires_consent.unwrap_or(false)
    }
}

//! Configuration struct definitions.
//!
//! Every section derives `Default` with the same values as the embedded
//! `defaults.toml`, so a partially specified file is always complete after
//! deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use warden_core::{RateLimit, SecurityTier};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audit log sizing.
    pub audit: AuditSection,
    /// Tool classification and fallback tier.
    pub permissions: PermissionsSection,
    /// Default rate limits per tier.
    pub rate_limits: RateLimitsSection,
    /// Periodic cleanup of rate-limit state.
    pub maintenance: MaintenanceSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// AuditSection
// ---------------------------------------------------------------------------

/// Audit log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Entries retained before the oldest are evicted.
    pub buffer_size: usize,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            buffer_size: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// PermissionsSection
// ---------------------------------------------------------------------------

/// Tool tier classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsSection {
    /// Tier applied to unclassified tools.
    pub fallback_tier: SecurityTier,
    /// Seed the built-in classifications before applying `tools`.
    pub seed_defaults: bool,
    /// Per-tool tier overrides.
    pub tools: BTreeMap<String, SecurityTier>,
}

impl Default for PermissionsSection {
    fn default() -> Self {
        Self {
            fallback_tier: SecurityTier::ReadOnly,
            seed_defaults: true,
            tools: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RateLimitsSection
// ---------------------------------------------------------------------------

/// Default rate limit for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitsSection {
    /// Limit for `read_only` tools.
    pub read_only: RateLimit,
    /// Limit for `write` tools.
    pub write: RateLimit,
    /// Limit for `execute` tools.
    pub execute: RateLimit,
    /// Limit for `privileged` tools.
    pub privileged: RateLimit,
}

impl RateLimitsSection {
    /// Limit configured for `tier`.
    #[must_use]
    pub fn for_tier(&self, tier: SecurityTier) -> RateLimit {
        match tier {
            SecurityTier::ReadOnly => self.read_only,
            SecurityTier::Write => self.write,
            SecurityTier::Execute => self.execute,
            SecurityTier::Privileged => self.privileged,
        }
    }
}

impl Default for RateLimitsSection {
    fn default() -> Self {
        Self {
            read_only: RateLimit::per_seconds(100, 60),
            write: RateLimit::per_seconds(30, 60),
            execute: RateLimit::per_seconds(10, 60),
            privileged: RateLimit::per_seconds(5, 60),
        }
    }
}

// ---------------------------------------------------------------------------
// MaintenanceSection
// ---------------------------------------------------------------------------

/// Rate-limit cleanup scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceSection {
    /// Whether the process runs its own cleanup task.
    pub enabled: bool,
    /// Seconds between cleanup sweeps.
    pub cleanup_interval_secs: u64,
    /// Timestamps older than this are dropped by a sweep.
    pub max_age_ms: u64,
}

impl Default for MaintenanceSection {
    fn default() -> Self {
        Self {
            enabled: false,
            cleanup_interval_secs: 300,
            max_age_ms: 300_000,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["warden_ratelimit=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

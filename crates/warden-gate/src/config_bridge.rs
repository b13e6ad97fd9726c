//! Bridge from `warden_config::Config` to control-plane types.
//!
//! The conversions live here so the CLI, daemons, and tests translate
//! configuration the same way.

use std::time::Duration;

use warden_config::Config;
use warden_core::SecurityTier;
use warden_permissions::{RateLimitTable, ToolTierRegistryBuilder};
use warden_telemetry::{LogConfig, TelemetryResult};

/// Tool registry builder seeded from `[permissions]`.
///
/// Per-tool overrides are not applied here; they go on last, after handler
/// declarations, so the operator has the final word.
#[must_use]
pub fn to_registry_builder(cfg: &Config) -> ToolTierRegistryBuilder {
    let builder = if cfg.permissions.seed_defaults {
        ToolTierRegistryBuilder::default().with_defaults()
    } else {
        ToolTierRegistryBuilder::default()
    };
    builder.fallback(cfg.permissions.fallback_tier)
}

/// Per-tool tier overrides from `[permissions.tools]`, sorted by name.
#[must_use]
pub fn to_tool_overrides(cfg: &Config) -> Vec<(String, SecurityTier)> {
    cfg.permissions
        .tools
        .iter()
        .map(|(name, tier)| (name.clone(), *tier))
        .collect()
}

/// Per-tier rate limits from `[rate_limits]`.
#[must_use]
pub fn to_rate_limit_table(cfg: &Config) -> RateLimitTable {
    SecurityTier::hierarchy()
        .into_iter()
        .fold(RateLimitTable::new(), |table, tier| {
            table.with(tier, cfg.rate_limits.for_tier(tier))
        })
}

/// Cleanup sweep interval from `[maintenance]`.
#[must_use]
pub fn to_cleanup_interval(cfg: &Config) -> Duration {
    Duration::from_secs(cfg.maintenance.cleanup_interval_secs)
}

/// Subscriber configuration from `[logging]`.
///
/// # Errors
///
/// Returns a telemetry error if the configured format is unknown.
pub fn to_log_config(cfg: &Config) -> TelemetryResult<LogConfig> {
    LogConfig::try_from(&cfg.logging)
}

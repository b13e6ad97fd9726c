//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use warden_core::SecurityTier;

/// Largest accepted audit buffer.
pub const MAX_AUDIT_BUFFER_SIZE: usize = 1_000_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_audit(config)?;
    validate_permissions(config)?;
    validate_rate_limits(config)?;
    validate_maintenance(config)?;
    validate_logging(config)?;
    Ok(())
}

fn error(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_audit(config: &Config) -> ConfigResult<()> {
    let size = config.audit.buffer_size;
    if size == 0 || size > MAX_AUDIT_BUFFER_SIZE {
        return Err(error(
            "audit.buffer_size",
            format!("buffer_size must be between 1 and {MAX_AUDIT_BUFFER_SIZE}, got {size}"),
        ));
    }
    Ok(())
}

fn validate_permissions(config: &Config) -> ConfigResult<()> {
    if let Some(name) = config
        .permissions
        .tools
        .keys()
        .find(|name| name.trim().is_empty())
    {
        return Err(error(
            format!("permissions.tools.{name:?}"),
            "tool names must not be empty",
        ));
    }
    Ok(())
}

fn validate_rate_limits(config: &Config) -> ConfigResult<()> {
    for tier in SecurityTier::hierarchy() {
        let limit = config.rate_limits.for_tier(tier);
        if limit.count == 0 {
            return Err(error(
                format!("rate_limits.{tier}.count"),
                "count must be greater than zero",
            ));
        }
        if limit.window_ms == 0 {
            return Err(error(
                format!("rate_limits.{tier}.window_ms"),
                "window_ms must be greater than zero",
            ));
        }
    }
    Ok(())
}

fn validate_maintenance(config: &Config) -> ConfigResult<()> {
    let m = &config.maintenance;
    if m.cleanup_interval_secs == 0 {
        return Err(error(
            "maintenance.cleanup_interval_secs",
            "cleanup interval must be greater than zero",
        ));
    }
    if m.max_age_ms == 0 {
        return Err(error(
            "maintenance.max_age_ms",
            "max age must be greater than zero",
        ));
    }
    // Sweeping younger timestamps would hand back quota inside a live window.
    let longest_window = SecurityTier::hierarchy()
        .into_iter()
        .map(|tier| config.rate_limits.for_tier(tier).window_ms)
        .max()
        .unwrap_or(0);
    if m.max_age_ms < longest_window {
        return Err(error(
            "maintenance.max_age_ms",
            format!(
                "max age ({} ms) must cover the longest rate-limit window ({longest_window} ms)",
                m.max_age_ms
            ),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_LEVELS.contains(&l.level.to_lowercase().as_str()) {
        return Err(error(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }
    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(error(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

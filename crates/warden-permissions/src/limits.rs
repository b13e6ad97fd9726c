//! Per-tier default rate limits.

use warden_core::{HandlerSecurityProperties, RateLimit, SecurityTier};

const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Built-in rate limit for `tier`.
///
/// | Tier | Limit |
/// |------|-------|
/// | `ReadOnly` | 100 per minute |
/// | `Write` | 30 per minute |
/// | `Execute` | 10 per minute |
/// | `Privileged` | 5 per minute |
#[must_use]
pub const fn default_rate_limit(tier: SecurityTier) -> RateLimit {
    let count = match tier {
        SecurityTier::ReadOnly => 100,
        SecurityTier::Write => 30,
        SecurityTier::Execute => 10,
        SecurityTier::Privileged => 5,
    };
    RateLimit::new(count, DEFAULT_WINDOW_MS)
}

/// Rate limits applied to handlers that do not declare their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitTable {
    limits: [RateLimit; 4],
}

impl RateLimitTable {
    /// Table holding the built-in defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: [
                default_rate_limit(SecurityTier::ReadOnly),
                default_rate_limit(SecurityTier::Write),
                default_rate_limit(SecurityTier::Execute),
                default_rate_limit(SecurityTier::Privileged),
            ],
        }
    }

    /// Limit for `tier`.
    #[must_use]
    pub const fn get(&self, tier: SecurityTier) -> RateLimit {
        self.limits[tier.index()]
    }

    /// Replace the limit for `tier`.
    pub fn set(&mut self, tier: SecurityTier, limit: RateLimit) {
        self.limits[tier.index()] = limit;
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, tier: SecurityTier, limit: RateLimit) -> Self {
        self.set(tier, limit);
        self
    }

    /// The handler's declared limit, or this table's entry for its tier.
    #[must_use]
    pub fn effective_rate_limit(&self, properties: &HandlerSecurityProperties) -> RateLimit {
        properties
            .rate_limit
            .unwrap_or_else(|| self.get(properties.tier))
    }
}

impl Default for RateLimitTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        assert_eq!(
            default_rate_limit(SecurityTier::ReadOnly),
            RateLimit::new(100, 60_000)
        );
        assert_eq!(default_rate_limit(SecurityTier::Write), RateLimit::new(30, 60_000));
        assert_eq!(default_rate_limit(SecurityTier::Execute), RateLimit::new(10, 60_000));
        assert_eq!(
            default_rate_limit(SecurityTier::Privileged),
            RateLimit::new(5, 60_000)
        );
    }

    #[test]
    fn test_stricter_tiers_have_lower_limits() {
        let counts: Vec<u32> = SecurityTier::hierarchy()
            .iter()
            .map(|t| default_rate_limit(*t).count)
            .collect();
        assert!(counts.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_table_override() {
        let table = RateLimitTable::new().with(SecurityTier::Execute, RateLimit::new(2, 1_000));
        assert_eq!(table.get(SecurityTier::Execute), RateLimit::new(2, 1_000));
        assert_eq!(table.get(SecurityTier::Write), RateLimit::new(30, 60_000));
    }

    #[test]
    fn test_effective_rate_limit() {
        let table = RateLimitTable::default();

        let declared = HandlerSecurityProperties::new(SecurityTier::Execute).with_rate_limit(3, 500);
        assert_eq!(table.effective_rate_limit(&declared), RateLimit::new(3, 500));

        let undeclared = HandlerSecurityProperties::new(SecurityTier::Execute);
        assert_eq!(
            table.effective_rate_limit(&undeclared),
            RateLimit::new(10, 60_000)
        );
    }
}

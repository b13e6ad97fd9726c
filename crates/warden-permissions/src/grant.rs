//! Tier upgrades and per-tool consent bookkeeping.
//!
//! These are pure functions over caller-owned state. The session layer
//! persists whatever they return.

use warden_core::{ConsentSet, SecurityError, SecurityResult, SecurityTier};

/// Move a session from `current` to `requested`.
///
/// Upgrades are monotonic. Re-granting the current tier succeeds.
///
/// # Errors
///
/// Returns [`SecurityError::TierDowngrade`] if `requested` is below `current`.
pub fn grant_tier(current: SecurityTier, requested: SecurityTier) -> SecurityResult<SecurityTier> {
    if requested < current {
        return Err(SecurityError::TierDowngrade { current, requested });
    }
    Ok(requested)
}

/// [`grant_tier`] with the requested tier given by name.
///
/// # Errors
///
/// Returns [`SecurityError::InvalidTier`] for an unrecognized name, otherwise
/// the same errors as [`grant_tier`].
pub fn grant_tier_named(current: SecurityTier, requested: &str) -> SecurityResult<SecurityTier> {
    let requested: SecurityTier = requested.parse()?;
    grant_tier(current, requested)
}

/// Return `consented` with `tool` added.
///
/// # Errors
///
/// Returns [`SecurityError::AlreadyConsented`] if `tool` is already present.
pub fn record_consent(consented: &ConsentSet, tool: &str) -> SecurityResult<ConsentSet> {
    if consented.contains(tool) {
        return Err(SecurityError::AlreadyConsented {
            tool: tool.to_string(),
        });
    }
    let mut next = consented.clone();
    next.insert(tool.to_string());
    Ok(next)
}

/// Return `consented` with `tool` removed.
///
/// # Errors
///
/// Returns [`SecurityError::NotConsented`] if `tool` is absent.
pub fn revoke_consent(consented: &ConsentSet, tool: &str) -> SecurityResult<ConsentSet> {
    if !consented.contains(tool) {
        return Err(SecurityError::NotConsented {
            tool: tool.to_string(),
        });
    }
    let mut next = consented.clone();
    next.remove(tool);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_allowed() {
        assert_eq!(
            grant_tier(SecurityTier::ReadOnly, SecurityTier::Write),
            Ok(SecurityTier::Write)
        );
        assert_eq!(
            grant_tier(SecurityTier::Write, SecurityTier::Privileged),
            Ok(SecurityTier::Privileged)
        );
    }

    #[test]
    fn test_regrant_same_tier() {
        assert_eq!(
            grant_tier(SecurityTier::Execute, SecurityTier::Execute),
            Ok(SecurityTier::Execute)
        );
    }

    #[test]
    fn test_downgrade_rejected() {
        assert_eq!(
            grant_tier(SecurityTier::Execute, SecurityTier::ReadOnly),
            Err(SecurityError::TierDowngrade {
                current: SecurityTier::Execute,
                requested: SecurityTier::ReadOnly,
            })
        );
    }

    #[test]
    fn test_grant_named() {
        assert_eq!(
            grant_tier_named(SecurityTier::ReadOnly, "execute"),
            Ok(SecurityTier::Execute)
        );
        assert_eq!(
            grant_tier_named(SecurityTier::ReadOnly, "ReadOnly"),
            Ok(SecurityTier::ReadOnly)
        );
        assert!(matches!(
            grant_tier_named(SecurityTier::ReadOnly, "root"),
            Err(SecurityError::InvalidTier { .. })
        ));
        assert!(matches!(
            grant_tier_named(SecurityTier::Privileged, "write"),
            Err(SecurityError::TierDowngrade { .. })
        ));
    }

    #[test]
    fn test_record_and_revoke_consent() {
        let empty = ConsentSet::new();
        let one = record_consent(&empty, "shell").unwrap();
        assert!(one.contains("shell"));
        // Input is left untouched.
        assert!(empty.is_empty());

        assert_eq!(
            record_consent(&one, "shell"),
            Err(SecurityError::AlreadyConsented {
                tool: "shell".to_string()
            })
        );

        let none = revoke_consent(&one, "shell").unwrap();
        assert!(none.is_empty());
        assert_eq!(
            revoke_consent(&none, "shell"),
            Err(SecurityError::NotConsented {
                tool: "shell".to_string()
            })
        );
    }
}

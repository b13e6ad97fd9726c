//! Registration-time checks on handler declarations and a path helper for
//! handler-level validation.

use std::path::{Component, Path};

use serde_json::{Map, Value};
use warden_core::{HandlerSecurityProperties, RateLimit, SecurityError, SecurityResult, SecurityTier};

use crate::error::{HandlerError, HandlerResult};

fn invalid(field: &str, reason: impl Into<String>) -> SecurityError {
    SecurityError::InvalidProperties {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Check a typed declaration.
///
/// # Errors
///
/// Returns [`SecurityError::InvalidProperties`] if the rate limit has a zero
/// count or window, or the timeout is zero.
pub fn validate_properties(properties: &HandlerSecurityProperties) -> SecurityResult<()> {
    if let Some(limit) = properties.rate_limit {
        if limit.count == 0 {
            return Err(invalid("rateLimit.count", "must be greater than zero"));
        }
        if limit.window_ms == 0 {
            return Err(invalid("rateLimit.windowMs", "must be greater than zero"));
        }
    }
    if properties.timeout_ms == Some(0) {
        return Err(invalid("timeoutMs", "must be greater than zero"));
    }
    Ok(())
}

/// Build a declaration from untyped JSON, such as a plugin manifest.
///
/// Accepts camelCase keys (`rateLimit`, `windowMs`, `timeoutMs`,
/// `requiresConsent`) and their snake_case forms. Unknown keys are ignored.
///
/// # Errors
///
/// - [`SecurityError::InvalidTier`] if `tier` is missing, not a string, or not
///   one of the four canonical names
/// - [`SecurityError::InvalidProperties`] for any other malformed field
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden_core::SecurityTier;
/// use warden_handler::parse_properties;
///
/// let props = parse_properties(&json!({
///     "tier": "execute",
///     "rateLimit": {"count": 10, "windowMs": 60000},
///     "requiresConsent": true
/// })).unwrap();
/// assert_eq!(props.tier, SecurityTier::Execute);
/// assert_eq!(props.requires_consent, Some(true));
///
/// assert!(parse_properties(&json!({"tier": "superuser"})).is_err());
/// ```
pub fn parse_properties(value: &Value) -> SecurityResult<HandlerSecurityProperties> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("properties", "must be an object"))?;

    let tier = parse_tier(obj.get("tier"))?;
    let mut properties = HandlerSecurityProperties::new(tier);

    if let Some(limit) = field(obj, "rateLimit", "rate_limit") {
        properties.rate_limit = Some(parse_rate_limit(limit)?);
    }
    if let Some(timeout) = field(obj, "timeoutMs", "timeout_ms") {
        properties.timeout_ms = Some(positive_u64(timeout, "timeoutMs")?);
    }
    if let Some(consent) = field(obj, "requiresConsent", "requires_consent") {
        properties.requires_consent = Some(
            consent
                .as_bool()
                .ok_or_else(|| invalid("requiresConsent", "must be a boolean"))?,
        );
    }

    validate_properties(&properties)?;
    Ok(properties)
}

/// Refuse paths containing a `..` component.
///
/// # Errors
///
/// Returns [`HandlerError::Rejected`] if any component is a parent reference.
pub fn reject_path_traversal(path: &str) -> HandlerResult<()> {
    if Path::new(path)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(HandlerError::Rejected(
            "path contains traversal sequence (..)".to_string(),
        ));
    }
    Ok(())
}

fn field<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel)
        .or_else(|| obj.get(snake))
        .filter(|v| !v.is_null())
}

fn parse_tier(value: Option<&Value>) -> SecurityResult<SecurityTier> {
    let Some(value) = value else {
        return Err(SecurityError::InvalidTier {
            value: String::new(),
        });
    };
    let Some(name) = value.as_str() else {
        return Err(SecurityError::InvalidTier {
            value: value.to_string(),
        });
    };
    name.parse()
}

fn parse_rate_limit(value: &Value) -> SecurityResult<RateLimit> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("rateLimit", "must be an object with count and windowMs"))?;

    let count = obj
        .get("count")
        .ok_or_else(|| invalid("rateLimit.count", "is required"))?;
    let count = positive_u64(count, "rateLimit.count")?;
    let count =
        u32::try_from(count).map_err(|_| invalid("rateLimit.count", "exceeds u32 range"))?;

    let window = field(obj, "windowMs", "window_ms")
        .ok_or_else(|| invalid("rateLimit.windowMs", "is required"))?;
    let window_ms = positive_u64(window, "rateLimit.windowMs")?;

    Ok(RateLimit::new(count, window_ms))
}

fn positive_u64(value: &Value, name: &str) -> SecurityResult<u64> {
    match value.as_u64() {
        Some(0) => Err(invalid(name, "must be greater than zero")),
        Some(n) => Ok(n),
        None => Err(invalid(name, "must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ------------------------------------------------------------------------
    // Typed declarations
    // ------------------------------------------------------------------------

    #[test]
    fn test_valid_typed_properties() {
        let props = HandlerSecurityProperties::new(SecurityTier::Write)
            .with_rate_limit(30, 60_000)
            .with_timeout_ms(5_000)
            .with_consent(false);
        assert!(validate_properties(&props).is_ok());
        assert!(validate_properties(&HandlerSecurityProperties::new(SecurityTier::ReadOnly)).is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let zero_count = HandlerSecurityProperties::new(SecurityTier::Write).with_rate_limit(0, 1_000);
        assert!(matches!(
            validate_properties(&zero_count),
            Err(SecurityError::InvalidProperties { field, .. }) if field == "rateLimit.count"
        ));

        let zero_window = HandlerSecurityProperties::new(SecurityTier::Write).with_rate_limit(5, 0);
        assert!(validate_properties(&zero_window).is_err());

        let zero_timeout = HandlerSecurityProperties::new(SecurityTier::Write).with_timeout_ms(0);
        assert!(validate_properties(&zero_timeout).is_err());
    }

    // ------------------------------------------------------------------------
    // Untyped declarations
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_full_manifest() {
        let props = parse_properties(&json!({
            "tier": "privileged",
            "rateLimit": {"count": 5, "windowMs": 60000},
            "timeoutMs": 30000,
            "requiresConsent": true,
            "description": "ignored"
        }))
        .unwrap();

        assert_eq!(props.tier, SecurityTier::Privileged);
        assert_eq!(props.rate_limit, Some(RateLimit::new(5, 60_000)));
        assert_eq!(props.timeout_ms, Some(30_000));
        assert_eq!(props.requires_consent, Some(true));
    }

    #[test]
    fn test_parse_snake_case_keys_and_pascal_tier() {
        let props = parse_properties(&json!({
            "tier": "ReadOnly",
            "rate_limit": {"count": 100, "window_ms": 60000},
            "timeout_ms": 10
        }))
        .unwrap();
        assert_eq!(props.tier, SecurityTier::ReadOnly);
        assert_eq!(props.rate_limit, Some(RateLimit::new(100, 60_000)));
    }

    #[test]
    fn test_parse_minimal() {
        let props = parse_properties(&json!({"tier": "write"})).unwrap();
        assert_eq!(props, HandlerSecurityProperties::new(SecurityTier::Write));
    }

    #[test]
    fn test_parse_tier_matches_tier_names() {
        for (name, expected) in [
            ("READ_ONLY", SecurityTier::ReadOnly),
            ("readonly", SecurityTier::ReadOnly),
            (" Execute ", SecurityTier::Execute),
            ("PRIVILEGED", SecurityTier::Privileged),
        ] {
            let props = parse_properties(&json!({ "tier": name })).unwrap();
            assert_eq!(props.tier, expected);
            assert!(warden_core::is_valid_tier(name));
        }
    }

    #[test]
    fn test_parse_rejects_bad_tier() {
        for tier in [
            json!("admin"),
            json!("READ-ONLY"),
            json!("r_e_a_d_only"),
            json!("-write-"),
            json!(3),
            json!(null),
        ] {
            assert!(
                matches!(
                    parse_properties(&json!({ "tier": tier })),
                    Err(SecurityError::InvalidTier { .. })
                ),
                "tier {tier} should be rejected"
            );
        }
        assert!(matches!(
            parse_properties(&json!({})),
            Err(SecurityError::InvalidTier { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_fields() {
        let cases = [
            json!({"tier": "write", "rateLimit": {"count": 0, "windowMs": 1000}}),
            json!({"tier": "write", "rateLimit": {"count": -1, "windowMs": 1000}}),
            json!({"tier": "write", "rateLimit": {"count": 1.5, "windowMs": 1000}}),
            json!({"tier": "write", "rateLimit": {"count": 5}}),
            json!({"tier": "write", "rateLimit": {"count": 5000000000_u64, "windowMs": 1000}}),
            json!({"tier": "write", "rateLimit": [5, 1000]}),
            json!({"tier": "write", "timeoutMs": 0}),
            json!({"tier": "write", "timeoutMs": "100"}),
            json!({"tier": "write", "requiresConsent": "yes"}),
        ];
        for case in cases {
            assert!(
                matches!(
                    parse_properties(&case),
                    Err(SecurityError::InvalidProperties { .. })
                ),
                "{case} should be rejected"
            );
        }
        assert!(parse_properties(&json!("write")).is_err());
    }

    // ------------------------------------------------------------------------
    // Path traversal
    // ------------------------------------------------------------------------

    #[test]
    fn test_reject_path_traversal() {
        assert!(reject_path_traversal("src/main.rs").is_ok());
        assert!(reject_path_traversal("/abs/path/file..txt").is_ok());
        assert!(reject_path_traversal("../etc/passwd").is_err());
        assert!(reject_path_traversal("src/../../secret").is_err());
    }
}

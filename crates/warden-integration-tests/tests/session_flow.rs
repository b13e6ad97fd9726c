//! Integration tests for session grants, consent, and tier upgrades.

mod common;

use common::PlaneHarness;
use warden_core::{SecurityError, SecurityTier, SessionGrant, is_allowed};
use warden_events::SecurityEvent;
use warden_permissions::{grant_tier, grant_tier_named, record_consent, revoke_consent};
use warden_test::test_session;

/// A `Write` session cannot run commands until it consents to the tool.
#[test]
fn test_write_session_run_command_needs_consent() {
    let harness = PlaneHarness::new();
    let session = test_session("write-session");
    let mut grant = SessionGrant::new(SecurityTier::Write);

    let err = harness
        .plane
        .check(&session, &grant, "run_command")
        .unwrap_err();
    assert_eq!(
        err,
        SecurityError::PermissionDenied {
            tool: "run_command".to_string(),
            required_tier: SecurityTier::Execute,
            granted_tier: SecurityTier::Write,
        }
    );
    assert_eq!(
        harness.sink.events(),
        vec![SecurityEvent::PermissionDenied {
            tool: "run_command".to_string(),
            required_tier: SecurityTier::Execute,
            granted_tier: SecurityTier::Write,
        }]
    );

    grant.consented_tools = record_consent(&grant.consented_tools, "run_command").unwrap();
    assert!(harness.plane.check(&session, &grant, "run_command").is_ok());

    // Consent is per tool.
    assert!(harness.plane.check(&session, &grant, "bash").is_err());
}

#[test]
fn test_consent_override_for_shell_at_read_only() {
    let harness = PlaneHarness::new();
    let session = test_session("s");
    let grant = SessionGrant::new(SecurityTier::ReadOnly).with_consent("shell");

    assert!(harness.plane.check(&session, &grant, "shell").is_ok());
    assert!(harness.sink.is_empty());
}

#[test]
fn test_revoked_consent_denies_again() {
    let harness = PlaneHarness::new();
    let session = test_session("s");
    let mut grant = SessionGrant::new(SecurityTier::Write).with_consent("git_push");
    assert!(harness.plane.check(&session, &grant, "git_push").is_ok());

    grant.consented_tools = revoke_consent(&grant.consented_tools, "git_push").unwrap();
    assert!(matches!(
        harness.plane.check(&session, &grant, "git_push"),
        Err(SecurityError::PermissionDenied { .. })
    ));
    assert_eq!(
        revoke_consent(&grant.consented_tools, "git_push"),
        Err(SecurityError::NotConsented {
            tool: "git_push".to_string()
        })
    );
}

#[test]
fn test_tier_upgrade_is_monotonic() {
    let harness = PlaneHarness::new();
    let session = test_session("s");
    let mut grant = SessionGrant::new(SecurityTier::ReadOnly);

    assert!(harness.plane.check(&session, &grant, "edit_file").is_err());

    grant.granted_tier = grant_tier(grant.granted_tier, SecurityTier::Write).unwrap();
    assert!(harness.plane.check(&session, &grant, "edit_file").is_ok());

    grant.granted_tier = grant_tier_named(grant.granted_tier, "execute").unwrap();
    assert!(harness.plane.check(&session, &grant, "run_tests").is_ok());

    assert_eq!(
        grant_tier(grant.granted_tier, SecurityTier::ReadOnly),
        Err(SecurityError::TierDowngrade {
            current: SecurityTier::Execute,
            requested: SecurityTier::ReadOnly,
        })
    );
    assert!(matches!(
        grant_tier_named(grant.granted_tier, "root"),
        Err(SecurityError::InvalidTier { .. })
    ));
}

#[test]
fn test_unknown_tiers_fail_closed() {
    assert!(!is_allowed("bogus", "privileged"));
    assert!(!is_allowed("read_only", "bogus"));
    assert!(is_allowed("read_only", "Privileged"));
}

#[test]
fn test_unknown_tool_uses_fallback() {
    let harness = PlaneHarness::with(|b| {
        b.tool_tiers(warden_permissions::ToolTierRegistry::builder().fallback(SecurityTier::Execute))
    });
    let session = test_session("s");

    assert!(harness
        .plane
        .check(&session, &SessionGrant::new(SecurityTier::Write), "mystery_tool")
        .is_err());
    assert!(harness
        .plane
        .check(&session, &SessionGrant::new(SecurityTier::Execute), "mystery_tool")
        .is_ok());
}

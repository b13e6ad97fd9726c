//! Test fixtures for common types.

use serde_json::{Value, json};
use warden_core::{HandlerSecurityProperties, SecurityTier, SessionGrant, SessionId};
use warden_handler::InvocationContext;

/// A fresh random session id.
#[must_use]
pub fn test_session_id() -> SessionId {
    SessionId::new()
}

/// A session id with a fixed name, for readable assertions.
#[must_use]
pub fn test_session(name: &str) -> SessionId {
    SessionId::from(name)
}

/// A grant at `tier` with no consents.
#[must_use]
pub fn test_grant(tier: SecurityTier) -> SessionGrant {
    SessionGrant::new(tier)
}

/// Properties declaring only a tier.
#[must_use]
pub fn test_properties(tier: SecurityTier) -> HandlerSecurityProperties {
    HandlerSecurityProperties::new(tier)
}

/// Invocation context for `tool` under a fixed `test-session` id.
#[must_use]
pub fn test_context(tool: &str, tier: SecurityTier) -> InvocationContext {
    InvocationContext::new(test_session("test-session"), tool, tier)
}

/// Arguments resembling a shell invocation, including a credential that
/// must never appear in audit output.
#[must_use]
pub fn sample_args() -> Value {
    json!({
        "command": "deploy --env prod",
        "cwd": "/srv/app",
        "env": { "API_TOKEN": "tok_9f8e7d6c5b4a39281706" },
    })
}

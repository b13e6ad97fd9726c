//! Argument fingerprinting.

use serde_json::Value;
use warden_crypto::{ContentHash, canonical_json};

/// BLAKE3 key-derivation context for argument digests.
pub const ARGS_HASH_DOMAIN: &str = "warden.audit.args v1";

/// Fingerprint invocation arguments.
///
/// The arguments are encoded as canonical JSON (keys sorted at every depth),
/// hashed in a dedicated BLAKE3 domain, and truncated to 128 bits. Equal
/// arguments always yield the same 32-character hex string regardless of key
/// order.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden_audit::hash_args;
///
/// let a = hash_args(&json!({"path": "/etc/passwd", "mode": "r"}));
/// let b = hash_args(&json!({"mode": "r", "path": "/etc/passwd"}));
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 32);
/// assert!(!a.contains("passwd"));
/// ```
#[must_use]
pub fn hash_args(args: &Value) -> String {
    ContentHash::hash_with_domain(ARGS_HASH_DOMAIN, &canonical_json(args)).fingerprint()
}

//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_permissions::prelude::*;` to import all essential types.

pub use crate::{PermissionEngine, RateLimitTable, ToolTierRegistry};

pub use crate::{default_rate_limit, grant_tier, grant_tier_named, record_consent, revoke_consent};

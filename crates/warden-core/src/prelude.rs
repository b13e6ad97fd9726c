//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{SecurityError, SecurityResult};

// Tiers and grants
pub use crate::{ConsentSet, SecurityTier, SessionGrant, is_allowed};

// Handler declarations
pub use crate::{HandlerSecurityProperties, RateLimit};

// Identifiers
pub use crate::{InvocationStatus, SessionId, Timestamp};

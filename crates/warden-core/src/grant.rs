//! Session-owned grant state.
//!
//! The control plane never stores a [`SessionGrant`]; callers pass it in on
//! every check and persist whatever the plane hands back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::tier::SecurityTier;

/// Set of tool names a session has explicitly consented to.
pub type ConsentSet = BTreeSet<String>;

/// A session's granted tier and per-tool consents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// Highest tier this session may use without consent.
    pub granted_tier: SecurityTier,
    /// Tools approved individually, regardless of tier.
    #[serde(default)]
    pub consented_tools: ConsentSet,
}

impl SessionGrant {
    /// A grant at `tier` with no consents.
    #[must_use]
    pub fn new(granted_tier: SecurityTier) -> Self {
        Self {
            granted_tier,
            consented_tools: ConsentSet::new(),
        }
    }

    /// Add a consented tool.
    #[must_use]
    pub fn with_consent(mut self, tool: impl Into<String>) -> Self {
        self.consented_tools.insert(tool.into());
        self
    }

    /// Whether the session consented to `tool`.
    #[must_use]
    pub fn has_consented(&self, tool: &str) -> bool {
        self.consented_tools.contains(tool)
    }
}

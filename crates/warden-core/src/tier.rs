//! The four-level privilege hierarchy.
//!
//! Tiers form a total order compared by position in [`SecurityTier::hierarchy`]:
//!
//! ```text
//! ReadOnly < Write < Execute < Privileged
//! ```
//!
//! The string-typed helpers ([`is_allowed`], [`is_valid_tier`]) exist for
//! boundaries where tiers arrive as untyped names (manifests, RPC payloads).
//! They are fail-closed: an unrecognized requested tier is never allowed, and
//! an unrecognized granted tier is never sufficient.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SecurityError;

/// Privilege level assigned to a tool and granted to a session.
///
/// # Example
///
/// ```
/// use warden_core::SecurityTier;
///
/// assert!(SecurityTier::Execute.allows(SecurityTier::Write));
/// assert!(!SecurityTier::Write.allows(SecurityTier::Execute));
/// assert_eq!("read_only".parse::<SecurityTier>().unwrap(), SecurityTier::ReadOnly);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SecurityTier {
    /// Observes state without changing it (file reads, searches).
    #[default]
    #[serde(alias = "ReadOnly")]
    ReadOnly,
    /// Mutates workspace content (file writes, edits, commits).
    #[serde(alias = "Write")]
    Write,
    /// Runs arbitrary processes (shell, test runners).
    #[serde(alias = "Execute")]
    Execute,
    /// Affects state outside the workspace (process control, pushes, installs).
    #[serde(alias = "Privileged")]
    Privileged,
}

impl SecurityTier {
    /// All tiers, lowest privilege first.
    pub const HIERARCHY: [Self; 4] = [Self::ReadOnly, Self::Write, Self::Execute, Self::Privileged];

    /// The fixed tier ordering, lowest privilege first.
    #[must_use]
    pub const fn hierarchy() -> [Self; 4] {
        Self::HIERARCHY
    }

    /// Position of this tier in the hierarchy.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::ReadOnly => 0,
            Self::Write => 1,
            Self::Execute => 2,
            Self::Privileged => 3,
        }
    }

    /// Whether a session holding `self` may run a tool requiring `requested`.
    #[must_use]
    pub const fn allows(self, requested: Self) -> bool {
        requested.index() <= self.index()
    }

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::Write => "write",
            Self::Execute => "execute",
            Self::Privileged => "privileged",
        }
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityTier {
    type Err = SecurityError;

    /// Parse a tier name.
    ///
    /// Matching ignores case and surrounding whitespace. Only the snake_case
    /// and PascalCase spellings are accepted, so `read_only`, `ReadOnly` and
    /// `READ_ONLY` resolve to [`SecurityTier::ReadOnly`] but `read-only` does
    /// not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read_only" | "readonly" => Ok(Self::ReadOnly),
            "write" => Ok(Self::Write),
            "execute" => Ok(Self::Execute),
            "privileged" => Ok(Self::Privileged),
            _ => Err(SecurityError::InvalidTier {
                value: s.to_string(),
            }),
        }
    }
}

/// Hierarchy position of a tier name, or `None` if the name is unknown.
#[must_use]
pub fn tier_index(name: &str) -> Option<usize> {
    name.parse::<SecurityTier>().ok().map(SecurityTier::index)
}

/// Check whether an untyped `requested` tier is covered by an untyped
/// `granted` tier.
///
/// Unknown requested tiers rank above every real tier and unknown granted
/// tiers rank below every real tier, so either one yields `false`.
///
/// # Example
///
/// ```
/// use warden_core::tier::is_allowed;
///
/// assert!(is_allowed("write", "execute"));
/// assert!(!is_allowed("bogus", "privileged"));
/// assert!(!is_allowed("read_only", "bogus"));
/// ```
#[must_use]
pub fn is_allowed(requested: &str, granted: &str) -> bool {
    match (tier_index(requested), tier_index(granted)) {
        (Some(requested), Some(granted)) => requested <= granted,
        _ => false,
    }
}

/// Whether `name` is one of the four canonical tiers.
#[must_use]
pub fn is_valid_tier(name: &str) -> bool {
    tier_index(name).is_some()
}

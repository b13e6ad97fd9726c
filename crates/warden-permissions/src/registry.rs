//! Tool name to security tier mapping.
//!
//! The registry is built once at start-up and shared behind an `Arc`. Request
//! handling only ever reads it.

use std::collections::HashMap;

use warden_core::SecurityTier;

/// Built-in tool classifications seeded by [`ToolTierRegistryBuilder::with_defaults`].
pub const DEFAULT_TOOL_TIERS: &[(&str, SecurityTier)] = &[
    // Read-only
    ("read_file", SecurityTier::ReadOnly),
    ("list_directory", SecurityTier::ReadOnly),
    ("glob", SecurityTier::ReadOnly),
    ("grep", SecurityTier::ReadOnly),
    ("search", SecurityTier::ReadOnly),
    ("git_status", SecurityTier::ReadOnly),
    ("git_diff", SecurityTier::ReadOnly),
    ("git_log", SecurityTier::ReadOnly),
    ("web_fetch", SecurityTier::ReadOnly),
    // Write
    ("write_file", SecurityTier::Write),
    ("edit_file", SecurityTier::Write),
    ("create_directory", SecurityTier::Write),
    ("move_file", SecurityTier::Write),
    ("git_commit", SecurityTier::Write),
    ("notebook_edit", SecurityTier::Write),
    // Execute
    ("run_command", SecurityTier::Execute),
    ("bash", SecurityTier::Execute),
    ("shell", SecurityTier::Execute),
    ("list_processes", SecurityTier::Execute),
    ("run_tests", SecurityTier::Execute),
    // Privileged
    ("kill_process", SecurityTier::Privileged),
    ("delete_file", SecurityTier::Privileged),
    ("git_push", SecurityTier::Privileged),
    ("sudo", SecurityTier::Privileged),
    ("install_package", SecurityTier::Privileged),
];

/// Immutable mapping from tool name to required tier.
#[derive(Debug, Clone)]
pub struct ToolTierRegistry {
    tiers: HashMap<String, SecurityTier>,
    fallback: SecurityTier,
}

impl ToolTierRegistry {
    /// Registry seeded with [`DEFAULT_TOOL_TIERS`] and a `ReadOnly` fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().with_defaults().build()
    }

    /// Start building a registry with no tools and a `ReadOnly` fallback.
    #[must_use]
    pub fn builder() -> ToolTierRegistryBuilder {
        ToolTierRegistryBuilder::default()
    }

    /// Tier registered for `tool`, if any.
    #[must_use]
    pub fn get(&self, tool: &str) -> Option<SecurityTier> {
        self.tiers.get(tool).copied()
    }

    /// Tier required by `tool`, using the fallback for unknown names.
    #[must_use]
    pub fn resolve(&self, tool: &str) -> SecurityTier {
        self.get(tool).unwrap_or(self.fallback)
    }

    /// Whether `tool` has an explicit classification.
    #[must_use]
    pub fn contains(&self, tool: &str) -> bool {
        self.tiers.contains_key(tool)
    }

    /// Tier applied to unregistered tools.
    #[must_use]
    pub fn fallback(&self) -> SecurityTier {
        self.fallback
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Registered tools sorted by name.
    #[must_use]
    pub fn tools(&self) -> Vec<(&str, SecurityTier)> {
        let mut tools: Vec<(&str, SecurityTier)> = self
            .tiers
            .iter()
            .map(|(name, tier)| (name.as_str(), *tier))
            .collect();
        tools.sort_unstable_by(|a, b| a.0.cmp(b.0));
        tools
    }

    /// Registered tools that require exactly `tier`, sorted by name.
    #[must_use]
    pub fn tools_at(&self, tier: SecurityTier) -> Vec<&str> {
        self.tools()
            .into_iter()
            .filter(|(_, t)| *t == tier)
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for ToolTierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ToolTierRegistry`].
///
/// Later entries for the same tool replace earlier ones, so configuration
/// overrides are applied after [`with_defaults`](Self::with_defaults).
#[derive(Debug, Clone, Default)]
pub struct ToolTierRegistryBuilder {
    tiers: HashMap<String, SecurityTier>,
    fallback: SecurityTier,
}

impl ToolTierRegistryBuilder {
    /// Seed the built-in classifications.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        for (name, tier) in DEFAULT_TOOL_TIERS {
            self.tiers.insert((*name).to_string(), *tier);
        }
        self
    }

    /// Classify a single tool.
    #[must_use]
    pub fn tool(mut self, name: impl Into<String>, tier: SecurityTier) -> Self {
        self.tiers.insert(name.into(), tier);
        self
    }

    /// Classify several tools.
    #[must_use]
    pub fn tools<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SecurityTier)>,
        S: Into<String>,
    {
        for (name, tier) in entries {
            self.tiers.insert(name.into(), tier);
        }
        self
    }

    /// Set the tier applied to unregistered tools.
    #[must_use]
    pub fn fallback(mut self, tier: SecurityTier) -> Self {
        self.fallback = tier;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ToolTierRegistry {
        ToolTierRegistry {
            tiers: self.tiers,
            fallback: self.fallback,
        }
    }
}

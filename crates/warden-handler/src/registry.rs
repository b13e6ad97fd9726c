//! Registry of validated tool handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use warden_core::{HandlerSecurityProperties, SecurityError, SecurityResult, SecurityTier};

use crate::contract::ToolHandler;
use crate::validate::validate_properties;

/// Handlers keyed by name. Declarations are validated on registration.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::InvalidProperties`] if the declaration is malformed
    /// - [`SecurityError::DuplicateHandler`] if the name is taken
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> SecurityResult<()> {
        let name = handler.name().to_string();
        if name.trim().is_empty() {
            return Err(SecurityError::InvalidProperties {
                field: "name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        validate_properties(handler.security_properties())?;
        if self.handlers.contains_key(&name) {
            return Err(SecurityError::DuplicateHandler { name });
        }

        debug!(
            handler = %name,
            tier = %handler.security_properties().tier,
            "Registered tool handler"
        );
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Look up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Declared properties for `name`.
    #[must_use]
    pub fn properties(&self, name: &str) -> Option<&HandlerSecurityProperties> {
        self.handlers.get(name).map(|h| h.security_properties())
    }

    /// Whether a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// `(name, tier)` for every handler, sorted by name, for seeding a tool
    /// tier registry.
    #[must_use]
    pub fn declared_tiers(&self) -> Vec<(String, SecurityTier)> {
        let mut tiers: Vec<(String, SecurityTier)> = self
            .handlers
            .iter()
            .map(|(name, h)| (name.clone(), h.security_properties().tier))
            .collect();
        tiers.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        tiers
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

//! The contract every tool implementation satisfies.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use warden_core::{HandlerSecurityProperties, SecurityTier, SessionId};

use crate::error::HandlerResult;

/// Per-invocation context handed to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Session issuing the invocation.
    pub session_id: SessionId,
    /// Tool being invoked.
    pub tool: String,
    /// Tier the session currently holds.
    pub granted_tier: SecurityTier,
    /// Root directory the session is confined to, if any.
    pub workspace_root: Option<PathBuf>,
}

impl InvocationContext {
    /// Context without a workspace root.
    #[must_use]
    pub fn new(session_id: SessionId, tool: impl Into<String>, granted_tier: SecurityTier) -> Self {
        Self {
            session_id,
            tool: tool.into(),
            granted_tier,
            workspace_root: None,
        }
    }

    /// Confine the invocation to `root`.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }
}

/// A tool implementation and its declared security properties.
///
/// Only `name`, `security_properties`, and `execute` are required. The
/// control plane calls `validate_security` before execution and
/// `sanitize_output` after it; neither is called by the plane for `execute`
/// itself, which belongs to the external executor.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{Value, json};
/// use warden_core::{HandlerSecurityProperties, SecurityTier};
/// use warden_handler::{HandlerResult, InvocationContext, ToolHandler};
///
/// struct Echo {
///     properties: HandlerSecurityProperties,
/// }
///
/// #[async_trait]
/// impl ToolHandler for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn security_properties(&self) -> &HandlerSecurityProperties {
///         &self.properties
///     }
///
///     async fn execute(&self, args: Value, _ctx: &InvocationContext) -> HandlerResult<Value> {
///         Ok(json!({ "echo": args }))
///     }
/// }
///
/// let echo = Echo { properties: HandlerSecurityProperties::new(SecurityTier::ReadOnly) };
/// assert_eq!(echo.name(), "echo");
/// ```
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name, unique within a registry.
    fn name(&self) -> &str;

    /// Properties declared once at registration and never changed.
    fn security_properties(&self) -> &HandlerSecurityProperties;

    /// Tool-specific checks beyond the tier model (paths, command patterns).
    ///
    /// Accepts everything by default.
    async fn validate_security(&self, _args: &Value, _ctx: &InvocationContext) -> HandlerResult<()> {
        Ok(())
    }

    /// Run the tool.
    async fn execute(&self, args: Value, ctx: &InvocationContext) -> HandlerResult<Value>;

    /// Scrub the output before it leaves the handler.
    ///
    /// Identity by default.
    fn sanitize_output(&self, output: Value) -> Value {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use serde_json::json;

    struct Minimal {
        properties: HandlerSecurityProperties,
    }

    #[async_trait]
    impl ToolHandler for Minimal {
        fn name(&self) -> &str {
            "minimal"
        }

        fn security_properties(&self) -> &HandlerSecurityProperties {
            &self.properties
        }

        async fn execute(&self, args: Value, _ctx: &InvocationContext) -> HandlerResult<Value> {
            Ok(args)
        }
    }

    struct NoTmp {
        properties: HandlerSecurityProperties,
    }

    #[async_trait]
    impl ToolHandler for NoTmp {
        fn name(&self) -> &str {
            "no_tmp"
        }

        fn security_properties(&self) -> &HandlerSecurityProperties {
            &self.properties
        }

        async fn validate_security(&self, args: &Value, _ctx: &InvocationContext) -> HandlerResult<()> {
            match args.get("path").and_then(Value::as_str) {
                Some(p) if p.starts_with("/tmp") => {
                    Err(HandlerError::Rejected("writes to /tmp are not allowed".to_string()))
                },
                _ => Ok(()),
            }
        }

        async fn execute(&self, _args: Value, _ctx: &InvocationContext) -> HandlerResult<Value> {
            Ok(json!({"secret": "s3cr3t", "ok": true}))
        }

        fn sanitize_output(&self, mut output: Value) -> Value {
            if let Some(obj) = output.as_object_mut() {
                obj.remove("secret");
            }
            output
        }
    }

    fn ctx() -> InvocationContext {
        InvocationContext::new(SessionId::from("s"), "minimal", SecurityTier::Write)
    }

    #[tokio::test]
    async fn test_defaults_are_permissive_identity() {
        let handler = Minimal {
            properties: HandlerSecurityProperties::new(SecurityTier::ReadOnly),
        };
        let args = json!({"x": 1});

        assert!(handler.validate_security(&args, &ctx()).await.is_ok());
        let out = handler.execute(args.clone(), &ctx()).await.unwrap();
        assert_eq!(handler.sanitize_output(out), args);
    }

    #[tokio::test]
    async fn test_overrides_apply() {
        let handler = NoTmp {
            properties: HandlerSecurityProperties::new(SecurityTier::Write),
        };

        let err = handler
            .validate_security(&json!({"path": "/tmp/x"}), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "writes to /tmp are not allowed");
        assert!(handler
            .validate_security(&json!({"path": "/home/x"}), &ctx())
            .await
            .is_ok());

        let out = handler.execute(Value::Null, &ctx()).await.unwrap();
        assert_eq!(handler.sanitize_output(out), json!({"ok": true}));
    }

    #[test]
    fn test_context_builder() {
        let ctx = ctx().with_workspace_root("/work");
        assert_eq!(ctx.workspace_root, Some(PathBuf::from("/work")));
        assert_eq!(ctx.tool, "minimal");
    }
}

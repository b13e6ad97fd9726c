//! Mock implementations for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use warden_core::{HandlerSecurityProperties, SecurityTier};
use warden_events::{EventSink, SecurityEvent};
use warden_handler::{HandlerError, HandlerResult, InvocationContext, SecretRedactor, ToolHandler};

/// Event sink that keeps every event it receives.
///
/// Uses `std::sync::Mutex` so it works from sync and async tests alike.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events whose [`SecurityEvent::event_type`] is `event_type`.
    #[must_use]
    pub fn of_type(&self, event_type: &str) -> Vec<SecurityEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SecurityEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Configurable [`ToolHandler`] for pipeline tests.
///
/// Echoes its arguments unless an output is set, rejects every invocation
/// when configured with a reason, and counts validate and execute calls.
#[derive(Debug)]
pub struct MockHandler {
    name: String,
    properties: HandlerSecurityProperties,
    reject_with: Option<String>,
    output: Option<Value>,
    redactor: Option<SecretRedactor>,
    validations: AtomicUsize,
    executions: AtomicUsize,
}

impl MockHandler {
    /// Handler named `name` declaring only `tier`.
    #[must_use]
    pub fn new(name: impl Into<String>, tier: SecurityTier) -> Self {
        Self {
            name: name.into(),
            properties: HandlerSecurityProperties::new(tier),
            reject_with: None,
            output: None,
            redactor: None,
            validations: AtomicUsize::new(0),
            executions: AtomicUsize::new(0),
        }
    }

    /// Replace the declared properties.
    #[must_use]
    pub fn with_properties(mut self, properties: HandlerSecurityProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Reject every `validate_security` call with `reason`.
    #[must_use]
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.reject_with = Some(reason.into());
        self
    }

    /// Return `output` from `execute` instead of echoing.
    #[must_use]
    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }

    /// Redact secrets in `sanitize_output`.
    #[must_use]
    pub fn with_redaction(mut self) -> Self {
        self.redactor = Some(SecretRedactor::new());
        self
    }

    /// Number of `validate_security` calls so far.
    #[must_use]
    pub fn validation_count(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }

    /// Number of `execute` calls so far.
    #[must_use]
    pub fn execution_count(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolHandler for MockHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn security_properties(&self) -> &HandlerSecurityProperties {
        &self.properties
    }

    async fn validate_security(&self, _args: &Value, _ctx: &InvocationContext) -> HandlerResult<()> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        match &self.reject_with {
            Some(reason) => Err(HandlerError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    async fn execute(&self, args: Value, _ctx: &InvocationContext) -> HandlerResult<Value> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone().unwrap_or(args))
    }

    fn sanitize_output(&self, output: Value) -> Value {
        match &self.redactor {
            Some(redactor) => redactor.redact_value(output),
            None => output,
        }
    }
}

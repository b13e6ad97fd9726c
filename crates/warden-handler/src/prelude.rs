//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_handler::prelude::*;` to import all essential types.

pub use crate::{
    HandlerError, HandlerRegistry, HandlerResult, InvocationContext, SecretRedactor, ToolHandler,
};

pub use crate::{parse_properties, reject_path_traversal, validate_properties};

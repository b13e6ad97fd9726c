//! Warden Handler - The contract between tool implementations and the
//! control plane.
//!
//! This crate provides:
//! - [`ToolHandler`], the async trait every tool implements, with permissive
//!   defaults for validation and output sanitization
//! - [`validate_properties`] and [`parse_properties`], run once when a
//!   handler is registered
//! - [`HandlerRegistry`], which rejects malformed or duplicate handlers
//! - [`SecretRedactor`] and [`reject_path_traversal`] for use inside handlers

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod contract;
mod error;
mod registry;
mod sanitize;
mod validate;

pub use contract::{InvocationContext, ToolHandler};
pub use error::{HandlerError, HandlerResult};
pub use registry::HandlerRegistry;
pub use sanitize::{REDACTED, SecretRedactor, redact};
pub use validate::{parse_properties, reject_path_traversal, validate_properties};

//! Warden Audit - Bounded record of every tool invocation.
//!
//! This crate provides:
//! - [`AuditLog`], an in-memory, process-lifetime log with a fixed capacity
//! - [`AuditEntry`] records that never contain invocation arguments
//! - [`hash_args`], the domain-separated 128-bit argument fingerprint
//! - [`AuditQuery`] for session/status filtering, ordering, and limits
//!
//! # Privacy
//!
//! Arguments are reduced to a BLAKE3 digest of their canonical JSON form
//! before anything is stored or logged. Identical arguments always produce
//! the same digest, so repeated invocations can be correlated without
//! retaining the payload.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod hash;
mod log;
mod query;

pub use entry::AuditEntry;
pub use hash::{ARGS_HASH_DOMAIN, hash_args};
pub use log::{AuditLog, DEFAULT_BUFFER_SIZE};
pub use query::{AuditQuery, DEFAULT_QUERY_LIMIT, SortOrder};

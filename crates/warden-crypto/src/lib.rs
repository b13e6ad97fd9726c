//! Warden Crypto - Content hashing primitives.
//!
//! This crate provides:
//! - [`ContentHash`], a BLAKE3 digest with domain separation and 128-bit
//!   fingerprints
//! - [`canonical_json`], a stable byte encoding of JSON values for hashing

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod canonical;
mod hash;

pub use canonical::canonical_json;
pub use hash::{ContentHash, FINGERPRINT_BYTES};

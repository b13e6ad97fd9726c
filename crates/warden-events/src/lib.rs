//! Warden Events - Security telemetry for the control plane.
//!
//! Permission denials, rate-limit hits, and audit records are emitted as
//! [`SecurityEvent`]s into an [`EventSink`]. Emission is fire-and-forget and
//! never affects the outcome of the operation that produced the event.
//!
//! Sinks provided here:
//! - [`NoopSink`] discards events
//! - [`TracingSink`] logs them as structured `tracing` records
//! - [`EventBus`] broadcasts them to async subscribers

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod event;
mod sink;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};
pub use event::SecurityEvent;
pub use sink::{EventSink, NoopSink, TracingSink};

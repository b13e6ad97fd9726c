//! Prelude module - commonly used types for convenient import.
//!
//! ```rust
//! use warden_gate::prelude::*;
//! ```

pub use crate::{ControlPlane, ControlPlaneBuilder, GateError, GateResult, bootstrap};

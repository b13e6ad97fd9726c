//! Prelude module - commonly used test utilities.
//!
//! ```rust
//! use warden_test::prelude::*;
//! ```

pub use crate::fixtures::{
    sample_args, test_context, test_grant, test_properties, test_session, test_session_id,
};
pub use crate::mocks::{MockHandler, RecordingSink};

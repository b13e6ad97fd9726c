//! Shared harness for integration tests.

use std::sync::Arc;

use warden_gate::{ControlPlane, ControlPlaneBuilder};
use warden_ratelimit::ManualClock;
use warden_test::RecordingSink;

/// A plane wired to a recording sink and a manual clock.
#[allow(dead_code)]
pub struct PlaneHarness {
    /// The assembled control plane.
    pub plane: ControlPlane,
    /// Every event the plane emitted.
    pub sink: Arc<RecordingSink>,
    /// Clock driving the rate limiter, starting at 0.
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl PlaneHarness {
    /// Harness with default tiers and limits.
    pub fn new() -> Self {
        Self::with(|builder| builder)
    }

    /// Harness with extra builder configuration applied.
    pub fn with(configure: impl FnOnce(ControlPlaneBuilder) -> ControlPlaneBuilder) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let clock = Arc::new(ManualClock::new(0));
        let builder = ControlPlane::builder()
            .sink(sink.clone())
            .clock(clock.clone());
        let plane = configure(builder).build().expect("plane should build");
        Self { plane, sink, clock }
    }
}

//! Metrics collection abstraction for the runner.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected with
//! [`crate::BoundedTaskRunner::with_metrics`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, TaskOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

use std::time::Duration;

use throttle_model::{ConcurrencyLimit, FailurePolicy, RunnerSpec, TimeoutMs};

use crate::error::CoreError;

/// Runtime configuration of a [`super::BoundedTaskRunner`].
///
/// Built from a declarative [`RunnerSpec`] or directly in code; immutable once the runner starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    pub concurrency: ConcurrencyLimit,
    pub failure: FailurePolicy,
    pub timeout_ms: Option<TimeoutMs>,
}

impl RunnerConfig {
    /// Config with the given raw limit and default policies.
    ///
    /// Fails with [`CoreError::Config`] when `limit` is zero.
    pub fn new(limit: usize) -> Result<Self, CoreError> {
        Ok(Self {
            concurrency: ConcurrencyLimit::new(limit)?,
            ..Self::default()
        })
    }

    /// Build a config from a spec.
    pub fn from_spec(spec: &RunnerSpec) -> Self {
        Self {
            concurrency: spec.concurrency,
            failure: spec.failure,
            timeout_ms: spec.timeout_ms,
        }
    }

    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: TimeoutMs) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Per-task timeout as a [`Duration`].
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl From<RunnerSpec> for RunnerConfig {
    fn from(spec: RunnerSpec) -> Self {
        Self::from_spec(&spec)
    }
}

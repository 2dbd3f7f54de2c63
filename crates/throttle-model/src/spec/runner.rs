use serde::{Deserialize, Serialize};

use crate::{ConcurrencyLimit, FailurePolicy, TimeoutMs};

/// Declarative configuration of a bounded runner.
///
/// `RunnerSpec` describes *how* a backlog is executed, not *what* is executed:
/// the tasks themselves are built in code and handed to the runner alongside it.
///
/// Fields cover:
/// - the concurrency bound (`concurrency`)
/// - the reaction to failed tasks (`failure`)
/// - an optional per-task time limit (`timeout_ms`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSpec {
    /// Maximum number of tasks in flight at once.
    pub concurrency: ConcurrencyLimit,
    /// What to do with the rest of the run once a task fails.
    #[serde(default)]
    pub failure: FailurePolicy,
    /// Hard time limit for each task body in milliseconds.
    ///
    /// When absent tasks may run for as long as they like.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<TimeoutMs>,
}

impl RunnerSpec {
    /// Spec with the given limit and default policies.
    pub fn with_concurrency(concurrency: ConcurrencyLimit) -> Self {
        Self {
            concurrency,
            ..Self::default()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_uses_defaults() {
        let spec: RunnerSpec = serde_json::from_str(r#"{"concurrency": 3}"#).unwrap();
        assert_eq!(spec.concurrency.get(), 3);
        assert_eq!(spec.failure, FailurePolicy::BestEffort);
        assert_eq!(spec.timeout_ms, None);
    }

    #[test]
    fn full_json() {
        let json = r#"{"concurrency": 2, "failure": "cancelOnFailure", "timeoutMs": 1500}"#;
        let spec: RunnerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec,
            RunnerSpec::with_concurrency(ConcurrencyLimit::new(2).unwrap())
                .with_failure(FailurePolicy::CancelOnFailure)
                .with_timeout_ms(1500)
        );
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let res = serde_json::from_str::<RunnerSpec>(r#"{"concurrency": 0}"#);
        assert!(res.is_err());
    }
}

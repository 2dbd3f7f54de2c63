use std::sync::Arc;

use crate::task::TaskError;

/// Task execution outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Task completed successfully.
    Success,
    /// Task failed or panicked.
    Failure,
    /// Task canceled.
    Canceled,
    /// Task timeout.
    Timeout,
}

impl TaskOutcome {
    /// Classify a task result.
    pub fn of<T>(result: &Result<T, TaskError>) -> Self {
        match result {
            Ok(_) => TaskOutcome::Success,
            Err(e) => TaskOutcome::from(e),
        }
    }

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskOutcome::Success => "success",
            TaskOutcome::Failure => "failure",
            TaskOutcome::Canceled => "canceled",
            TaskOutcome::Timeout => "timeout",
        }
    }
}

impl From<&TaskError> for TaskOutcome {
    fn from(e: &TaskError) -> Self {
        match e {
            TaskError::Timeout { .. } => TaskOutcome::Timeout,
            TaskError::Canceled => TaskOutcome::Canceled,
            TaskError::Fail { .. } | TaskError::Panicked { .. } => TaskOutcome::Failure,
        }
    }
}

/// Backend metrics collection interface.
///
/// Called from the runner driver; implementations must be cheap and must not block.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a task moving from the backlog into the active set.
    fn record_task_admitted(&self);
    /// Record task completion with outcome and duration.
    ///
    /// # Arguments
    /// - `outcome`: How the task terminated
    /// - `duration_ms`: Time between admission and completion in milliseconds
    fn record_task_completed(&self, outcome: TaskOutcome, duration_ms: u64);
    /// Record a reporter that failed or panicked while handling a snapshot.
    ///
    /// # Arguments
    /// - `reporter`: Reporter name
    fn record_report_error(&self, reporter: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_results() {
        assert_eq!(TaskOutcome::of(&Ok::<_, TaskError>(1)), TaskOutcome::Success);
        assert_eq!(
            TaskOutcome::of::<()>(&Err(TaskError::Canceled)),
            TaskOutcome::Canceled
        );
        assert_eq!(
            TaskOutcome::of::<()>(&Err(TaskError::Timeout { timeout_ms: 5 })),
            TaskOutcome::Timeout
        );
        assert_eq!(
            TaskOutcome::of::<()>(&Err(TaskError::Panicked { reason: "x".into() })),
            TaskOutcome::Failure
        );
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(TaskOutcome::Success.as_label(), "success");
        assert_eq!(TaskOutcome::Failure.as_label(), "failure");
        assert_eq!(TaskOutcome::Canceled.as_label(), "canceled");
        assert_eq!(TaskOutcome::Timeout.as_label(), "timeout");
    }
}

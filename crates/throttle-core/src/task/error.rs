use thiserror::Error;
use throttle_model::{TaskStatus, TimeoutMs};

/// Failure outcome of a single task.
///
/// Task errors are data: the runner stores them next to the task and never propagates them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task failed: {reason}")]
    Fail { reason: String },

    #[error("task canceled")]
    Canceled,

    #[error("task exceeded timeout of {timeout_ms}ms")]
    Timeout { timeout_ms: TimeoutMs },

    #[error("task panicked: {reason}")]
    Panicked { reason: String },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    /// Terminal status recorded for this error.
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskError::Fail { .. } | TaskError::Panicked { .. } => TaskStatus::Failed,
            TaskError::Canceled => TaskStatus::Canceled,
            TaskError::Timeout { .. } => TaskStatus::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(TaskError::fail("boom").status(), TaskStatus::Failed);
        assert_eq!(
            TaskError::Panicked {
                reason: "oops".into()
            }
            .status(),
            TaskStatus::Failed
        );
        assert_eq!(TaskError::Canceled.status(), TaskStatus::Canceled);
        assert_eq!(
            TaskError::Timeout { timeout_ms: 10 }.status(),
            TaskStatus::Timeout
        );
    }

    #[test]
    fn display_keeps_reason() {
        assert_eq!(TaskError::fail("disk full").to_string(), "task failed: disk full");
    }
}

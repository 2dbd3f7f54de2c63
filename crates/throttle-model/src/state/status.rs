use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a single task as seen by the runner.
///
/// A task only ever moves forward: `Pending` -> `Active` -> one of the terminal statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Waiting in the backlog.
    Pending,
    /// Admitted and in flight.
    Active,
    /// Resolved with a value.
    Succeeded,
    /// Resolved with a failure reason (including a panicking task body).
    Failed,
    /// Canceled before or while running.
    Canceled,
    /// Exceeded the configured per-task timeout.
    Timeout,
}

impl TaskStatus {
    /// Returns `true` for statuses a task can never leave.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending | TaskStatus::Active)
    }

    /// Returns `true` for terminal statuses that count as a failed outcome.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Timeout)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Active => "active",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
            TaskStatus::Timeout => "timeout",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStatus;

    #[test]
    fn terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Active.is_terminal());
        for s in [
            TaskStatus::Succeeded,
            TaskStatus::Failed,
            TaskStatus::Canceled,
            TaskStatus::Timeout,
        ] {
            assert!(s.is_terminal(), "{s} must be terminal");
        }
    }

    #[test]
    fn only_failed_and_timeout_are_failures() {
        assert!(TaskStatus::Failed.is_failure());
        assert!(TaskStatus::Timeout.is_failure());
        assert!(!TaskStatus::Canceled.is_failure());
        assert!(!TaskStatus::Succeeded.is_failure());
    }
}

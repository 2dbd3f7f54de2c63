use std::fmt;

use throttle_model::TaskId;
use tokio_util::sync::CancellationToken;

/// Per-task execution context handed to [`super::Task::run`].
#[derive(Clone)]
pub struct TaskContext {
    id: TaskId,
    cancel: CancellationToken,
}

impl TaskContext {
    /// Create a context for the given task.
    pub fn new(id: TaskId, cancel: CancellationToken) -> Self {
        Self { id, cancel }
    }

    /// Identity of the running task (its backlog position).
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Token cancelled when the run asks in-flight tasks to stop.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when cancellation is requested.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("id", &self.id)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_token_sees_parent_cancellation() {
        let parent = CancellationToken::new();
        let ctx = TaskContext::new(TaskId::new(4), parent.child_token());

        assert_eq!(ctx.id(), TaskId::new(4));
        assert!(!ctx.is_cancelled());

        parent.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn debug_shows_cancel_state() {
        let ctx = TaskContext::new(TaskId::new(1), CancellationToken::new());
        let s = format!("{ctx:?}");
        assert!(s.contains("cancelled: false"), "unexpected debug output: {s}");
    }
}

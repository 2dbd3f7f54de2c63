use std::future::Future;

use super::{BoxTaskFuture, Task, TaskContext, TaskError, TaskRef};

/// Task built from a closure.
///
/// ```rust
/// use throttle_core::{TaskContext, TaskError, TaskFn, TaskRef};
///
/// let task: TaskRef<u32> = TaskFn::boxed("answer", |_ctx: TaskContext| async move {
///     Ok::<_, TaskError>(42)
/// });
/// assert_eq!(task.name(), "answer");
/// ```
pub struct TaskFn<F> {
    name: String,
    f: F,
}

impl<F> TaskFn<F> {
    /// Wrap a closure under the given name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Wrap a closure and erase its type, ready to be pushed into a backlog.
    pub fn boxed<T, Fut>(name: impl Into<String>, f: F) -> TaskRef<T>
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
        T: Send + 'static,
    {
        Box::new(Self::new(name, f))
    }
}

impl<T, F, Fut> Task<T> for TaskFn<F>
where
    F: FnOnce(TaskContext) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(self: Box<Self>, ctx: TaskContext) -> BoxTaskFuture<T> {
        Box::pin((self.f)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use throttle_model::TaskId;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn runs_closure_with_context() {
        let task: TaskRef<usize> = TaskFn::boxed("pos", |ctx: TaskContext| async move {
            Ok::<_, TaskError>(ctx.id().position() * 10)
        });

        let out = task
            .run(TaskContext::new(TaskId::new(3), CancellationToken::new()))
            .await;
        assert_eq!(out, Ok(30));
    }

    #[tokio::test]
    async fn propagates_failure() {
        let task: TaskRef<()> = TaskFn::boxed("bad", |_ctx: TaskContext| async move {
            Err(TaskError::fail("nope"))
        });

        let out = task
            .run(TaskContext::new(TaskId::new(0), CancellationToken::new()))
            .await;
        assert_eq!(out, Err(TaskError::fail("nope")));
    }
}

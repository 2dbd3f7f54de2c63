//! Task abstraction consumed by the runner.
//!
//! A task is a one-shot unit of asynchronous work with a single eventual outcome.
//! The runner never inspects how a task suspends: it only hands the task a [`TaskContext`]
//! and waits for the returned future to resolve.
mod context;
pub use context::TaskContext;

mod error;
pub use error::TaskError;

mod func;
pub use func::TaskFn;

use std::{future::Future, pin::Pin};

/// Boxed future produced by a running task.
pub type BoxTaskFuture<T> = Pin<Box<dyn Future<Output = Result<T, TaskError>> + Send + 'static>>;

/// Owned, type-erased task as stored in a runner backlog.
pub type TaskRef<T> = Box<dyn Task<T>>;

/// One-shot unit of work producing `T` or a [`TaskError`].
///
/// Implementations decide how the work suspends (timers, I/O, child processes, ...).
/// `run` consumes the task: a task is executed at most once and never retried by the runner.
pub trait Task<T>: Send + 'static {
    /// Task name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Start the work and return the future that resolves with its outcome.
    ///
    /// `ctx` carries the task identity and a cancellation token. Honoring cancellation is
    /// cooperative: the runner never preempts a body that ignores it (unless a timeout is set).
    fn run(self: Box<Self>, ctx: TaskContext) -> BoxTaskFuture<T>;
}

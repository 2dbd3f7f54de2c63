//! Bounded-concurrency runner.
//!
//! [`BoundedTaskRunner`] takes a backlog of tasks and a concurrency limit N and keeps at most
//! N of them in flight. Tasks move strictly `pending -> active -> completed`:
//! - admission is FIFO from the backlog;
//! - completions may arrive in any order and are matched by task identity;
//! - every completion re-evaluates the admission rule;
//! - the run finishes when nothing is pending or active.
//!
//! Each transition produces one [`Snapshot`](throttle_model::Snapshot) for the injected reporter.
mod config;
pub use config::RunnerConfig;

mod driver;
use driver::Driver;

mod handle;
pub use handle::{CompletedTask, RunHandle, RunReport};

mod state;
use state::RunnerState;


use std::{
    fmt,
    sync::{Arc, Mutex},
};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
    error::CoreError,
    metrics::{MetricsHandle, noop_metrics},
    report::{ReporterHandle, noop_reporter},
    task::TaskRef,
};

/// Runner that admits a fixed number of concurrently in-flight tasks from a backlog.
///
/// ```rust
/// use throttle_core::{BoundedTaskRunner, RunnerConfig, TaskContext, TaskError, TaskFn, TaskRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), throttle_core::CoreError> {
/// let tasks: Vec<TaskRef<usize>> = (0..5)
///     .map(|i| TaskFn::boxed(format!("square-{i}"), move |_ctx: TaskContext| async move {
///         Ok::<_, TaskError>(i * i)
///     }))
///     .collect();
///
/// let runner = BoundedTaskRunner::new(RunnerConfig::new(2)?, tasks);
/// let report = runner.run().await?;
/// assert!(report.is_success());
/// assert_eq!(report.completed().len(), 5);
/// # Ok(())
/// # }
/// ```
pub struct BoundedTaskRunner<T> {
    config: RunnerConfig,
    total: usize,
    backlog: Mutex<Option<Vec<TaskRef<T>>>>,
    reporter: ReporterHandle,
    metrics: MetricsHandle,
}

impl<T: Send + 'static> BoundedTaskRunner<T> {
    /// Create a runner over the given backlog.
    ///
    /// Task ids are assigned by position in `tasks`.
    pub fn new(config: RunnerConfig, tasks: impl IntoIterator<Item = TaskRef<T>>) -> Self {
        let tasks: Vec<_> = tasks.into_iter().collect();
        Self {
            config,
            total: tasks.len(),
            backlog: Mutex::new(Some(tasks)),
            reporter: noop_reporter(),
            metrics: noop_metrics(),
        }
    }

    /// Set the reporter invoked after every state transition.
    pub fn with_reporter(mut self, reporter: ReporterHandle) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Number of tasks submitted to this runner.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Start admitting tasks.
    ///
    /// Fills free capacity from the backlog right away (reported as one `Started` transition)
    /// and hands the rest of the run to a driver task on the current tokio runtime.
    ///
    /// Errors:
    /// - [`CoreError::NoRuntime`] when called outside a tokio runtime;
    /// - [`CoreError::AlreadyStarted`] on every call after the first; nothing is admitted twice.
    #[instrument(level = "debug", skip(self), fields(concurrency = %self.config.concurrency, total = self.total))]
    pub fn start(&self) -> Result<RunHandle<T>, CoreError> {
        let rt = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let tasks = self
            .backlog
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(CoreError::AlreadyStarted)?;

        info!(
            failure = %self.config.failure,
            timeout_ms = ?self.config.timeout_ms,
            "run started"
        );

        let state = Arc::new(Mutex::new(RunnerState::new(tasks.len())));
        let cancel = CancellationToken::new();

        let mut driver = Driver::new(
            &self.config,
            tasks,
            Arc::clone(&state),
            Arc::clone(&self.reporter),
            Arc::clone(&self.metrics),
            cancel.clone(),
        );
        driver.start();

        Ok(RunHandle {
            state,
            cancel,
            driver: rt.spawn(driver.run()),
        })
    }

    /// Start the runner and wait for it to finish.
    pub async fn run(self) -> Result<RunReport<T>, CoreError> {
        self.start()?.wait().await
    }
}

impl<T> fmt::Debug for BoundedTaskRunner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedTaskRunner")
            .field("config", &self.config)
            .field("total", &self.total)
            .field("reporter", &self.reporter.name())
            .finish()
    }
}

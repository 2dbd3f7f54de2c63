pub mod error;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod task;

pub use error::CoreError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, TaskOutcome, noop_metrics};
pub use report::{
    FnReporter, MultiReporter, NoOpReporter, Report, ReportError, ReporterHandle, noop_reporter,
};
pub use runner::{BoundedTaskRunner, CompletedTask, RunHandle, RunReport, RunnerConfig};
pub use task::{BoxTaskFuture, Task, TaskContext, TaskError, TaskFn, TaskRef};

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::report::{Report, ReportError};
    pub use crate::runner::{BoundedTaskRunner, RunHandle, RunReport, RunnerConfig};
    pub use crate::task::{Task, TaskContext, TaskError, TaskFn, TaskRef};
}

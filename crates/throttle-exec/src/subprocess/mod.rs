//! Tasks that run OS subprocesses.
//!
//! [`SubprocessTask`] describes a command; [`SubprocessTask::build`] validates it and
//! returns a [`throttle_core::TaskRef`] that can be pushed into a runner backlog.
//! The child is spawned with `tokio::process::Command` when the runner admits the task,
//! and killed when the task's cancellation token fires or its future is dropped.
mod config;
mod output;
mod task;

pub use config::LogConfig;
pub use task::{ProcessExit, SubprocessTask};

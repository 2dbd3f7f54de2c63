use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use throttle_model::{Snapshot, TaskId, TaskStatus};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    error::CoreError,
    runner::state::{RunnerState, lock},
    task::TaskError,
};

/// A task that reached the completed set, with its outcome.
#[derive(Debug)]
pub struct CompletedTask<T> {
    pub id: TaskId,
    pub name: String,
    pub outcome: Result<T, TaskError>,
}

impl<T> CompletedTask<T> {
    /// Terminal status of this task.
    pub fn status(&self) -> TaskStatus {
        match &self.outcome {
            Ok(_) => TaskStatus::Succeeded,
            Err(e) => e.status(),
        }
    }
}

/// Final result of a run: every task, in completion order.
#[derive(Debug)]
pub struct RunReport<T> {
    completed: Vec<CompletedTask<T>>,
    elapsed: Duration,
}

impl<T> RunReport<T> {
    pub(crate) fn new(completed: Vec<CompletedTask<T>>, elapsed: Duration) -> Self {
        Self { completed, elapsed }
    }

    /// Completed tasks in completion order.
    pub fn completed(&self) -> &[CompletedTask<T>] {
        &self.completed
    }

    /// Task ids in completion order.
    pub fn order(&self) -> Vec<TaskId> {
        self.completed.iter().map(|c| c.id).collect()
    }

    /// Look up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&CompletedTask<T>> {
        self.completed.iter().find(|c| c.id == id)
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.completed.iter().filter(|c| c.status() == status).count()
    }

    /// Returns `true` if every task succeeded.
    pub fn is_success(&self) -> bool {
        self.completed.iter().all(|c| c.outcome.is_ok())
    }

    /// Wall time between `start()` and the last completion.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn into_completed(self) -> Vec<CompletedTask<T>> {
        self.completed
    }
}

/// Handle to a started run.
///
/// Gives read access to the live state, a cancellation switch and the completion signal.
pub struct RunHandle<T> {
    pub(crate) state: Arc<Mutex<RunnerState>>,
    pub(crate) cancel: CancellationToken,
    pub(crate) driver: JoinHandle<RunReport<T>>,
}

impl<T> RunHandle<T> {
    /// Current state of the run.
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.state).snapshot()
    }

    /// Returns `true` once nothing is pending or in flight.
    pub fn is_finished(&self) -> bool {
        lock(&self.state).is_finished()
    }

    /// Ask the run to stop.
    ///
    /// In-flight tasks observe the request through their [`crate::TaskContext`]; tasks still in
    /// the backlog complete as [`TaskError::Canceled`] without running.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this run, for callers that need to cancel after handing off the handle.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run to finish.
    ///
    /// Resolves once, after the last completion was recorded and reported.
    pub async fn wait(self) -> Result<RunReport<T>, CoreError> {
        self.driver
            .await
            .map_err(|e| CoreError::Driver(e.to_string()))
    }
}

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use throttle_model::{FailurePolicy, Snapshot, TaskId, TaskStatus, TimeoutMs, Transition};
use tokio::{
    task::{self, JoinHandle, JoinSet},
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::{
    metrics::{MetricsHandle, TaskOutcome},
    report::{ReporterHandle, deliver, panic_message},
    runner::{
        RunnerConfig,
        handle::{CompletedTask, RunReport},
        state::{RunnerState, lock},
    },
    task::{TaskContext, TaskError, TaskRef},
};

/// Owner of a run's bookkeeping.
///
/// All admission and completion logic runs here, one step at a time, so two
/// evaluations of the admission rule never interleave.
pub(crate) struct Driver<T> {
    limit: usize,
    failure: FailurePolicy,
    timeout_ms: Option<TimeoutMs>,
    state: Arc<Mutex<RunnerState>>,
    backlog: VecDeque<(TaskId, TaskRef<T>)>,
    running: JoinSet<Result<T, TaskError>>,
    /// Supervisor task id -> the runner task it supervises.
    in_flight: HashMap<task::Id, (TaskId, String)>,
    admitted_at: HashMap<TaskId, Instant>,
    completed: Vec<CompletedTask<T>>,
    reporter: ReporterHandle,
    metrics: MetricsHandle,
    cancel: CancellationToken,
    draining: bool,
    started: Instant,
}

impl<T: Send + 'static> Driver<T> {
    pub(crate) fn new(
        config: &RunnerConfig,
        tasks: Vec<TaskRef<T>>,
        state: Arc<Mutex<RunnerState>>,
        reporter: ReporterHandle,
        metrics: MetricsHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            limit: config.concurrency.get(),
            failure: config.failure,
            timeout_ms: config.timeout_ms,
            state,
            backlog: tasks
                .into_iter()
                .enumerate()
                .map(|(pos, task)| (TaskId::new(pos), task))
                .collect(),
            running: JoinSet::new(),
            in_flight: HashMap::new(),
            admitted_at: HashMap::new(),
            completed: Vec::new(),
            reporter,
            metrics,
            cancel,
            draining: false,
            started: Instant::now(),
        }
    }

    /// Fill free capacity from the backlog and report it as a single `Started` transition.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn start(&mut self) {
        let mut admitted = Vec::new();
        while let Some((id, task)) = self.admit_one() {
            self.spawn(id, task);
            admitted.push(id);
        }
        debug!(admitted = admitted.len(), "initial admission done");

        let snap = lock(&self.state).record(Transition::Started { admitted });
        self.report(&snap);
    }

    /// Process completions until the backlog and the active set are both empty.
    pub(crate) async fn run(mut self) -> RunReport<T> {
        while !self.is_finished() {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled(), if !self.draining => {
                    info!("run cancellation requested; draining backlog");
                    self.draining = true;
                    self.admit_ready();
                }
                joined = self.running.join_next_with_id() => match joined {
                    Some(Ok((supervisor, outcome))) => self.on_joined(supervisor, outcome),
                    Some(Err(e)) => {
                        error!(error = %e, "task supervisor terminated abnormally");
                        let supervisor = e.id();
                        let outcome = if e.is_panic() {
                            Err(TaskError::Panicked {
                                reason: panic_message(e.into_panic().as_ref()),
                            })
                        } else {
                            Err(TaskError::Canceled)
                        };
                        self.on_joined(supervisor, outcome);
                    }
                    None => {
                        error!("no task in flight but run is not finished; stopping driver");
                        break;
                    }
                },
            }
        }

        let report = RunReport::new(self.completed, self.started.elapsed());
        info!(
            succeeded = report.count(TaskStatus::Succeeded),
            failed = report.count(TaskStatus::Failed),
            canceled = report.count(TaskStatus::Canceled),
            timeout = report.count(TaskStatus::Timeout),
            elapsed_ms = report.elapsed().as_millis() as u64,
            "run finished"
        );
        report
    }

    fn is_finished(&self) -> bool {
        lock(&self.state).is_finished()
    }

    /// Apply the admission rule once: move the backlog head into the active set if there is room.
    fn admit_one(&mut self) -> Option<(TaskId, TaskRef<T>)> {
        let id = lock(&self.state).admit(self.limit)?;
        let (queued, task) = self.backlog.pop_front()?;
        debug_assert_eq!(queued, id, "backlog and pending state out of sync");

        self.admitted_at.insert(id, Instant::now());
        self.metrics.record_task_admitted();
        trace!(task = %id, name = task.name(), "task admitted");
        Some((id, task))
    }

    /// Re-evaluate the admission rule until capacity or backlog runs out.
    ///
    /// While draining, admitted tasks are resolved as canceled without running their body.
    fn admit_ready(&mut self) {
        while let Some((id, task)) = self.admit_one() {
            let snap = lock(&self.state).record(Transition::Admitted { id });
            self.report(&snap);

            if self.draining {
                trace!(task = %id, "run is draining; resolving task as canceled");
                let name = task.name().to_string();
                self.settle(id, name, Err(TaskError::Canceled));
            } else {
                self.spawn(id, task);
            }
        }
    }

    fn spawn(&mut self, id: TaskId, task: TaskRef<T>) {
        let ctx = TaskContext::new(id, self.cancel.child_token());
        let timeout_ms = self.timeout_ms;
        let name = task.name().to_string();

        let supervisor = self.running.spawn(async move {
            let body = tokio::spawn(task.run(ctx));
            supervise(body, timeout_ms).await
        });
        self.in_flight.insert(supervisor.id(), (id, name));
    }

    fn on_joined(&mut self, supervisor: task::Id, outcome: Result<T, TaskError>) {
        let Some((id, name)) = self.in_flight.remove(&supervisor) else {
            error!(supervisor = %supervisor, "joined a supervisor that tracks no task");
            return;
        };
        self.settle(id, name, outcome);
        self.admit_ready();
    }

    /// Record a resolved task: completed set, metrics, report and failure policy.
    fn settle(&mut self, id: TaskId, name: String, outcome: Result<T, TaskError>) {
        let status = match &outcome {
            Ok(_) => TaskStatus::Succeeded,
            Err(e) => e.status(),
        };
        let elapsed = self
            .admitted_at
            .remove(&id)
            .map(|at| at.elapsed())
            .unwrap_or_default();
        self.metrics
            .record_task_completed(TaskOutcome::of(&outcome), elapsed.as_millis() as u64);

        match &outcome {
            Ok(_) => debug!(task = %id, name = %name, elapsed_ms = elapsed.as_millis() as u64, "task succeeded"),
            Err(e) => debug!(task = %id, name = %name, elapsed_ms = elapsed.as_millis() as u64, error = %e, "task resolved with error"),
        }
        self.completed.push(CompletedTask { id, name, outcome });

        let snap = {
            let mut st = lock(&self.state);
            if !st.complete(id) {
                error!(task = %id, "completion for a task that is not active");
            }
            st.record(Transition::Completed { id, status })
        };
        self.report(&snap);

        if status.is_failure() && self.failure.cancels_on_failure() && !self.draining {
            warn!(task = %id, status = %status, "task failed; cancelling the rest of the run");
            self.draining = true;
            self.cancel.cancel();
        }
    }

    fn report(&self, snap: &Snapshot) {
        trace!(
            seq = snap.seq,
            pending = snap.pending.len(),
            active = snap.active.len(),
            completed = snap.completed.len(),
            "reporting snapshot"
        );
        deliver(self.reporter.as_ref(), snap, &self.metrics);
    }
}

/// Await a spawned task body, applying the optional timeout and isolating panics.
async fn supervise<T>(
    mut body: JoinHandle<Result<T, TaskError>>,
    timeout_ms: Option<TimeoutMs>,
) -> Result<T, TaskError> {
    let joined = match timeout_ms {
        Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), &mut body).await {
            Ok(joined) => joined,
            Err(_) => {
                body.abort();
                return Err(TaskError::Timeout { timeout_ms: ms });
            }
        },
        None => body.await,
    };

    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(TaskError::Panicked {
            reason: panic_message(e.into_panic().as_ref()),
        }),
        Err(_) => Err(TaskError::Canceled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metrics::noop_metrics,
        report::noop_reporter,
        task::TaskFn,
    };

    #[tokio::test]
    async fn aborted_supervisor_still_settles_its_task() {
        let stuck = TaskFn::boxed("stuck", |_ctx: TaskContext| async {
            std::future::pending::<()>().await;
            Ok::<_, TaskError>(())
        });
        let quick = TaskFn::boxed("quick", |_ctx: TaskContext| async { Ok::<_, TaskError>(()) });

        let state = Arc::new(Mutex::new(RunnerState::new(2)));
        let mut driver = Driver::new(
            &RunnerConfig::new(1).unwrap(),
            vec![stuck, quick],
            Arc::clone(&state),
            noop_reporter(),
            noop_metrics(),
            CancellationToken::new(),
        );
        driver.start();
        driver.running.abort_all();

        let report = driver.run().await;
        assert_eq!(report.order(), vec![TaskId::new(0), TaskId::new(1)]);
        assert_eq!(report.completed()[0].status(), TaskStatus::Canceled);
        assert_eq!(report.completed()[1].status(), TaskStatus::Succeeded);
        assert!(lock(&state).is_finished());
    }
}

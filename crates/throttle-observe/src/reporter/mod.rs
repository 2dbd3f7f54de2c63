//! Reporter that renders runner transitions as structured `tracing` events.
//!
//! Levels follow what an operator usually wants to see:
//! start and drained-backlog at `info`, admissions and successes at `debug`,
//! cancellations at `info`, failures and timeouts at `warn`.

use throttle_core::{Report, ReportError};
use throttle_model::{Snapshot, TaskStatus, Transition};
use tracing::{debug, info, warn};

/// Logs every snapshot it receives.
///
/// Optional `run` label is attached to each event so concurrent runners can be told apart.
#[derive(Debug, Clone, Default)]
pub struct LogReporter {
    run: Option<String>,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with `run = label`.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            run: Some(label.into()),
        }
    }

    fn run(&self) -> &str {
        self.run.as_deref().unwrap_or("-")
    }
}

impl Report for LogReporter {
    fn report(&self, s: &Snapshot) -> Result<(), ReportError> {
        log_snapshot(self.run(), s);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

fn log_snapshot(run: &str, s: &Snapshot) {
    let (pending, active, completed) = (s.pending.len(), s.active.len(), s.completed.len());

    match &s.transition {
        None => debug!(run, seq = s.seq, pending, "runner idle"),
        Some(t @ Transition::Started { admitted }) => info!(
            run,
            seq = s.seq,
            admitted = admitted.len(),
            pending,
            "{}",
            message_for(t)
        ),
        Some(t @ Transition::Admitted { id }) => debug!(
            run,
            seq = s.seq,
            task = %id,
            pending,
            active,
            "{}",
            message_for(t)
        ),
        Some(t @ Transition::Completed { id, status }) => {
            let msg = message_for(t);
            match status {
                TaskStatus::Failed | TaskStatus::Timeout => warn!(
                    run, seq = s.seq, task = %id, %status, pending, active, completed, "{msg}"
                ),
                TaskStatus::Canceled => info!(
                    run, seq = s.seq, task = %id, %status, pending, active, completed, "{msg}"
                ),
                _ => debug!(
                    run, seq = s.seq, task = %id, %status, pending, active, completed, "{msg}"
                ),
            }
        }
    }

    if s.transition.is_some() && s.is_finished() {
        info!(run, seq = s.seq, completed, "backlog drained");
    }
}

#[inline]
fn message_for(t: &Transition) -> &'static str {
    match t {
        Transition::Started { .. } => "runner started; initial capacity filled",
        Transition::Admitted { .. } => "task admitted from backlog",
        Transition::Completed { status, .. } => match status {
            TaskStatus::Succeeded => "task succeeded",
            TaskStatus::Failed => "task failed",
            TaskStatus::Canceled => "task canceled",
            TaskStatus::Timeout => "task exceeded its timeout",
            TaskStatus::Pending | TaskStatus::Active => "task completed in a non-terminal state",
        },
    }
}

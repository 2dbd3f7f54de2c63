use serde::{Deserialize, Serialize};

use crate::{TaskId, TaskStatus};

/// State transition that produced a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transition {
    /// The runner started and filled its free capacity from the backlog in one step.
    Started { admitted: Vec<TaskId> },
    /// A task moved from the backlog into the active set.
    Admitted { id: TaskId },
    /// An active task resolved and moved into the completed set.
    Completed { id: TaskId, status: TaskStatus },
}

impl Transition {
    pub fn kind(&self) -> &'static str {
        match self {
            Transition::Started { .. } => "started",
            Transition::Admitted { .. } => "admitted",
            Transition::Completed { .. } => "completed",
        }
    }
}

/// Point-in-time view of a runner's three collections.
///
/// - `pending`: backlog order (FIFO);
/// - `active`: admission order;
/// - `completed`: completion order.
///
/// `seq` grows by one with every transition, so consumers can detect gaps or reordering.
/// `transition` is the change that produced this view (`None` before the runner starts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    pub pending: Vec<TaskId>,
    pub active: Vec<TaskId>,
    pub completed: Vec<TaskId>,
}

impl Snapshot {
    /// Number of tasks across all three collections.
    pub fn total(&self) -> usize {
        self.pending.len() + self.active.len() + self.completed.len()
    }

    /// Returns `true` once nothing is pending or in flight.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }
}

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
};

use throttle_model::{Snapshot, TaskId, Transition};

/// The three disjoint collections a runner moves tasks through.
///
/// Every task id lives in exactly one of `pending`, `active` or `completed`.
/// Only the runner driver mutates this state; observers read it through [`Snapshot`]s.
#[derive(Debug, Default)]
pub(crate) struct RunnerState {
    pending: VecDeque<TaskId>,
    active: Vec<TaskId>,
    completed: Vec<TaskId>,
    seq: u64,
    last: Option<Transition>,
}

impl RunnerState {
    /// State for a backlog of `total` tasks, all pending.
    pub(crate) fn new(total: usize) -> Self {
        Self {
            pending: (0..total).map(TaskId::new).collect(),
            ..Self::default()
        }
    }

    /// Move the head of the backlog into the active set if there is room under `limit`.
    pub(crate) fn admit(&mut self, limit: usize) -> Option<TaskId> {
        if self.active.len() >= limit {
            return None;
        }
        let id = self.pending.pop_front()?;
        self.active.push(id);
        Some(id)
    }

    /// Move an active task into the completed set.
    ///
    /// Lookup is by identity: tasks finish in any order relative to their admission.
    /// Returns `false` if `id` is not active.
    pub(crate) fn complete(&mut self, id: TaskId) -> bool {
        match self.active.iter().position(|a| *a == id) {
            Some(pos) => {
                self.active.remove(pos);
                self.completed.push(id);
                true
            }
            None => false,
        }
    }

    /// Stamp a transition and return the resulting snapshot.
    pub(crate) fn record(&mut self, transition: Transition) -> Snapshot {
        self.seq += 1;
        self.last = Some(transition);
        self.snapshot()
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            seq: self.seq,
            transition: self.last.clone(),
            pending: self.pending.iter().copied().collect(),
            active: self.active.clone(),
            completed: self.completed.clone(),
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }
}

/// Lock the shared state.
///
/// Bookkeeping never panics while holding the lock, so a poisoned mutex still holds consistent data.
pub(crate) fn lock(state: &Mutex<RunnerState>) -> MutexGuard<'_, RunnerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

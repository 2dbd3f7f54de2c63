use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a task inside one run.
///
/// The value is the zero-based position of the task in the original backlog.
/// It carries no meaning beyond observability: the runner never orders or schedules by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(usize);

impl TaskId {
    /// Create an id for the task at the given backlog position.
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    /// Backlog position of the task.
    pub const fn position(&self) -> usize {
        self.0
    }
}

impl From<usize> for TaskId {
    fn from(position: usize) -> Self {
        Self(position)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskId;

    #[test]
    fn display_uses_backlog_position() {
        assert_eq!(TaskId::new(0).to_string(), "#0");
        assert_eq!(TaskId::new(17).to_string(), "#17");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&TaskId::new(3)).unwrap();
        assert_eq!(json, "3");

        let back: TaskId = serde_json::from_str("3").unwrap();
        assert_eq!(back.position(), 3);
    }
}

mod domain;
pub use domain::{ConcurrencyLimit, Flag, TaskId, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::RunnerSpec;

mod state;
pub use state::{Snapshot, TaskStatus, Transition};

mod strategy;
pub use strategy::FailurePolicy;

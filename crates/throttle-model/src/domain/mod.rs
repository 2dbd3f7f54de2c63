mod flag;
pub use flag::Flag;

mod id;
pub use id::TaskId;

mod limit;
pub use limit::ConcurrencyLimit;

/// Timeout value in milliseconds.
///
/// Used by runner specs where an explicit per-task time limit is required.
pub type TimeoutMs = u64;

mod snapshot;
pub use snapshot::{Snapshot, Transition};

mod status;
pub use status::TaskStatus;

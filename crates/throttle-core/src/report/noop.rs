use throttle_model::Snapshot;

use super::{Report, ReportError};

/// Reporter that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl Report for NoOpReporter {
    #[inline(always)]
    fn report(&self, _: &Snapshot) -> Result<(), ReportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

use throttle_model::Snapshot;
use tracing::trace;

use super::{Report, ReportError, ReporterHandle, guarded};

/// Fan-out reporter.
///
/// Every inner reporter sees every snapshot, in registration order, even if an earlier one
/// fails or panics. The first failure is returned once all reporters ran.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<ReporterHandle>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reporter.
    pub fn with(mut self, reporter: ReporterHandle) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Report for MultiReporter {
    fn report(&self, snapshot: &Snapshot) -> Result<(), ReportError> {
        let mut first_err = None;
        for r in &self.reporters {
            if let Err(e) = guarded(r.as_ref(), snapshot) {
                trace!(reporter = r.name(), error = %e, "inner reporter failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn name(&self) -> &'static str {
        "multi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FnReporter;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    struct Broken;

    impl Report for Broken {
        fn report(&self, _: &Snapshot) -> Result<(), ReportError> {
            panic!("broken reporter")
        }
    }

    #[test]
    fn later_reporters_run_after_a_panic() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let multi = MultiReporter::new()
            .with(Arc::new(Broken))
            .with(Arc::new(FnReporter::new(move |_: &Snapshot| {
                counter.fetch_add(1, Ordering::SeqCst);
            })));

        let res = multi.report(&Snapshot::default());
        assert!(matches!(res, Err(ReportError::Panicked(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(multi.len(), 2);
    }
}

use throttle_model::Snapshot;

use super::{Report, ReportError};

/// Reporter backed by a closure.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use throttle_core::{FnReporter, Report};
/// use throttle_model::Snapshot;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let reporter = FnReporter::new(move |s: &Snapshot| sink.lock().unwrap().push(s.seq));
///
/// reporter.report(&Snapshot::default()).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![0]);
/// ```
pub struct FnReporter<F> {
    f: F,
}

impl<F> FnReporter<F>
where
    F: Fn(&Snapshot) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Report for FnReporter<F>
where
    F: Fn(&Snapshot) + Send + Sync + 'static,
{
    fn report(&self, snapshot: &Snapshot) -> Result<(), ReportError> {
        (self.f)(snapshot);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}

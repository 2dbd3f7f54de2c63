//! Reporting hook invoked by the runner after every state transition.
//!
//! Reporters run synchronously on the runner's driver, strictly in transition order.
//! A failing or panicking reporter is isolated by [`deliver`]: the failure is logged
//! and counted, and task bookkeeping carries on untouched.
mod error;
pub use error::ReportError;

mod func;
pub use func::FnReporter;

mod multi;
pub use multi::MultiReporter;

mod noop;
pub use noop::NoOpReporter;

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use throttle_model::Snapshot;
use tracing::warn;

use crate::metrics::MetricsHandle;

/// Consumer of runner snapshots.
pub trait Report: Send + Sync + 'static {
    /// Handle one snapshot. Called exactly once per transition.
    fn report(&self, snapshot: &Snapshot) -> Result<(), ReportError>;

    /// Reporter name used in logs and metrics.
    fn name(&self) -> &'static str {
        "reporter"
    }
}

/// Shared handle to a reporter.
pub type ReporterHandle = Arc<dyn Report>;

/// Create a no-op reporter handle.
#[inline]
pub fn noop_reporter() -> ReporterHandle {
    Arc::new(NoOpReporter)
}

/// Invoke `reporter` and swallow whatever goes wrong.
///
/// Returns `false` if the reporter returned an error or panicked.
pub(crate) fn deliver(reporter: &dyn Report, snapshot: &Snapshot, metrics: &MetricsHandle) -> bool {
    match guarded(reporter, snapshot) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                reporter = reporter.name(),
                seq = snapshot.seq,
                error = %e,
                "reporter failed; snapshot dropped"
            );
            metrics.record_report_error(reporter.name());
            false
        }
    }
}

/// Call the reporter, turning a panic into [`ReportError::Panicked`].
pub(crate) fn guarded(reporter: &dyn Report, snapshot: &Snapshot) -> Result<(), ReportError> {
    match panic::catch_unwind(AssertUnwindSafe(|| reporter.report(snapshot))) {
        Ok(res) => res,
        Err(payload) => Err(ReportError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Best-effort extraction of a panic payload message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::noop_metrics;

    struct Failing;

    impl Report for Failing {
        fn report(&self, _: &Snapshot) -> Result<(), ReportError> {
            Err(ReportError::new("sink closed"))
        }
    }

    struct Panicking;

    impl Report for Panicking {
        fn report(&self, _: &Snapshot) -> Result<(), ReportError> {
            panic!("reporter blew up")
        }
    }

    #[test]
    fn deliver_swallows_errors() {
        let metrics = noop_metrics();
        assert!(!deliver(&Failing, &Snapshot::default(), &metrics));
        assert!(deliver(&NoOpReporter, &Snapshot::default(), &metrics));
    }

    #[test]
    fn guarded_turns_panic_into_error() {
        let err = guarded(&Panicking, &Snapshot::default()).unwrap_err();
        match err {
            ReportError::Panicked(msg) => assert_eq!(msg, "reporter blew up"),
            other => panic!("expected Panicked, got {other:?}"),
        }
    }
}

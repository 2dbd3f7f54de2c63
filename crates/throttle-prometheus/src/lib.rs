//! Prometheus metrics backend for the bounded task runner.
//!
//! [`PrometheusMetrics`] implements [`throttle_core::MetricsBackend`]; attach it with
//! [`throttle_core::BoundedTaskRunner::with_metrics`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use throttle_core::{BoundedTaskRunner, RunnerConfig, TaskRef};
//! use throttle_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let runner: BoundedTaskRunner<()> =
//!     BoundedTaskRunner::new(RunnerConfig::new(4)?, Vec::<TaskRef<()>>::new())
//!         .with_metrics(Arc::new(metrics.clone()));
//! # let _ = runner;
//!
//! let text = metrics.render()?;
//! assert!(text.is_empty() || text.contains("throttle_"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `throttle_tasks_admitted_total` - Counter
//! - `throttle_tasks_completed_total{outcome}` - Counter
//! - `throttle_task_duration_seconds` - Histogram
//! - `throttle_report_errors_total{reporter}` - Counter
//!
//! No HTTP endpoint is provided; serve [`PrometheusMetrics::gather`] from whatever
//! server the host already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};

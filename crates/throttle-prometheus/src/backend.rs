use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use throttle_core::{MetricsBackend, TaskOutcome};

const NAMESPACE: &str = "throttle";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// - `outcome`: "success", "failure", "canceled", "timeout"
/// - `reporter`: the reporter's static name
#[derive(Clone)]
pub struct PrometheusMetrics {
    tasks_admitted: Counter,
    tasks_completed: CounterVec,
    task_duration: Histogram,
    report_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register the runner metrics in `registry`.
    ///
    /// Fails if the registry already holds metrics with the same names.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let tasks_admitted = Counter::with_opts(
            Opts::new("tasks_admitted_total", "Tasks moved from the backlog into the active set")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(tasks_admitted.clone()))?;

        let tasks_completed = CounterVec::new(
            Opts::new("tasks_completed_total", "Tasks resolved, by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(tasks_completed.clone()))?;

        let task_duration = Histogram::with_opts(
            HistogramOpts::new(
                "task_duration_seconds",
                "Time from admission to completion in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0]),
        )?;
        registry.register(Box::new(task_duration.clone()))?;

        let report_errors = CounterVec::new(
            Opts::new("report_errors_total", "Reporter failures and panics").namespace(NAMESPACE),
            &["reporter"],
        )?;
        registry.register(Box::new(report_errors.clone()))?;

        Ok(Self {
            tasks_admitted,
            tasks_completed,
            task_duration,
            report_errors,
            registry,
        })
    }

    /// Backend with its own fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Underlying registry, for registering host metrics next to the runner's.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_task_admitted(&self) {
        self.tasks_admitted.inc();
    }

    fn record_task_completed(&self, outcome: TaskOutcome, duration_ms: u64) {
        self.tasks_completed
            .with_label_values(&[outcome.as_label()])
            .inc();
        self.task_duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_report_error(&self, reporter: &str) {
        self.report_errors.with_label_values(&[reporter]).inc();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use throttle_core::{
        BoundedTaskRunner, Report, ReportError, RunnerConfig, TaskContext, TaskError, TaskFn,
        TaskRef,
    };
    use throttle_model::Snapshot;

    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn completed_counter_is_split_by_outcome() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_task_admitted();
        metrics.record_task_admitted();
        metrics.record_task_completed(TaskOutcome::Success, 150);
        metrics.record_task_completed(TaskOutcome::Timeout, 2000);

        let families = metrics.gather();
        assert_eq!(
            family(&families, "throttle_tasks_completed_total").get_metric().len(),
            2
        );

        let text = metrics.render().unwrap();
        assert!(text.contains("throttle_tasks_admitted_total 2"));
        assert!(text.contains(r#"throttle_tasks_completed_total{outcome="timeout"} 1"#));
        assert!(text.contains("throttle_task_duration_seconds_count 2"));
        assert!(text.contains("throttle_task_duration_seconds_sum 2.15"));
    }

    #[test]
    fn report_errors_are_labelled_by_reporter() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_report_error("log");
        metrics.record_report_error("log");
        metrics.record_report_error("webhook");

        let families = metrics.gather();
        assert_eq!(
            family(&families, "throttle_report_errors_total").get_metric().len(),
            2
        );
    }

    #[test]
    fn registering_twice_in_one_registry_fails() {
        let registry = Arc::new(Registry::new());
        assert!(PrometheusMetrics::new_with_registry(Arc::clone(&registry)).is_ok());
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }

    #[test]
    fn render_emits_text_format() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_task_admitted();
        let text = metrics.render().unwrap();
        assert!(text.contains("throttle_tasks_admitted_total 1"));
    }

    struct Broken;

    impl Report for Broken {
        fn report(&self, _: &Snapshot) -> Result<(), ReportError> {
            Err(ReportError::new("down"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runner_feeds_the_backend() {
        let metrics = PrometheusMetrics::new().unwrap();
        let tasks: Vec<TaskRef<()>> = vec![
            TaskFn::boxed("ok", |_ctx: TaskContext| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, TaskError>(())
            }),
            TaskFn::boxed("bad", |_ctx: TaskContext| async {
                Err::<(), _>(TaskError::fail("nope"))
            }),
        ];

        BoundedTaskRunner::new(RunnerConfig::new(1).unwrap(), tasks)
            .with_metrics(Arc::new(metrics.clone()))
            .with_reporter(Arc::new(Broken))
            .run()
            .await
            .unwrap();

        let families = metrics.gather();
        assert_eq!(
            family(&families, "throttle_tasks_completed_total").get_metric().len(),
            2
        );

        let text = metrics.render().unwrap();
        assert!(text.contains("throttle_tasks_admitted_total 2"));
        assert!(text.contains(r#"throttle_tasks_completed_total{outcome="failure"} 1"#));
        // start + admit + two completions, every one of them rejected
        assert!(text.contains(r#"throttle_report_errors_total{reporter="broken"} 4"#));
    }
}

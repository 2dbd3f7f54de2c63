use std::{path::Path, sync::Arc};

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use throttle_core::{BoundedTaskRunner, MultiReporter, RunnerConfig, TaskRef};
use throttle_exec::{ProcessExit, SubprocessTask};
use throttle_model::{ConcurrencyLimit, Flag, RunnerSpec, TaskStatus};
use throttle_observe::{LogReporter, LoggerConfig, init_local_offset, init_logger};
use throttle_prometheus::PrometheusMetrics;

/// Agent configuration, read from the JSON file given as the first argument.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AgentConfig {
    logger: LoggerConfig,
    runner: Option<RunnerSpec>,
}

impl AgentConfig {
    fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    fn runner_spec(&self) -> anyhow::Result<RunnerSpec> {
        match &self.runner {
            Some(spec) => Ok(spec.clone()),
            None => Ok(RunnerSpec::with_concurrency(ConcurrencyLimit::new(2)?)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // local offset must be read while the process is still single-threaded
    init_local_offset();

    let path = std::env::args_os().nth(1);
    let cfg = AgentConfig::load(path.as_deref().map(Path::new))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 1) logger
    init_logger(&cfg.logger)?;
    info!("logger initialized");

    // 2) reporters + metrics
    let reporter = MultiReporter::new().with(Arc::new(LogReporter::labeled("agentd")));
    let metrics = PrometheusMetrics::new()?;

    // 3) backlog
    let spec = cfg.runner_spec()?;
    let tasks = demo_backlog()?;
    info!(
        concurrency = %spec.concurrency,
        failure = %spec.failure,
        timeout_ms = ?spec.timeout_ms,
        tasks = tasks.len(),
        "runner configured"
    );

    let runner = BoundedTaskRunner::new(RunnerConfig::from_spec(&spec), tasks)
        .with_reporter(Arc::new(reporter))
        .with_metrics(Arc::new(metrics.clone()));

    // 4) run, cancel on ctrl-c
    let handle = runner.start()?;
    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; canceling run");
            cancel.cancel();
        }
    });
    let report = handle.wait().await?;

    // 5) summary
    for done in report.completed() {
        match &done.outcome {
            Ok(exit) => info!(task = %done.name, id = %done.id, %exit, "task finished"),
            Err(e) => warn!(task = %done.name, id = %done.id, error = %e, "task did not succeed"),
        }
    }
    info!(
        elapsed_ms = report.elapsed().as_millis() as u64,
        succeeded = report.count(TaskStatus::Succeeded),
        failed = report.count(TaskStatus::Failed),
        canceled = report.count(TaskStatus::Canceled),
        timeout = report.count(TaskStatus::Timeout),
        "run summary"
    );

    print!("{}", metrics.render()?);
    Ok(())
}

fn demo_backlog() -> anyhow::Result<Vec<TaskRef<ProcessExit>>> {
    Ok(vec![
        SubprocessTask::new("date").build()?,
        SubprocessTask::new("ls").name("ls-tmp").arg("/tmp").build()?,
        SubprocessTask::new("sleep").name("sleep-2").arg("2").build()?,
        SubprocessTask::new("sh")
            .name("exit-1")
            .args(["-c", "echo failing on purpose >&2; exit 1"])
            .build()?,
        SubprocessTask::new("sleep").name("sleep-1").arg("1").build()?,
        SubprocessTask::new("sh")
            .name("grep-miss")
            .args(["-c", "echo hello | grep -q bye"])
            .fail_on_non_zero(Flag::disabled())
            .build()?,
    ])
}

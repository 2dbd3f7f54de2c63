use std::{fmt, path::PathBuf, process::Stdio, time::Duration};

use throttle_core::{BoxTaskFuture, Task, TaskContext, TaskError, TaskRef};
use throttle_model::Flag;
use tokio::{process::Command, task::JoinHandle, time::Instant};
use tracing::{debug, trace};

use super::{
    config::{LogConfig, SubprocessConfig},
    output::{Stream, pump},
};
use crate::ExecError;

/// How long output still buffered in the pipes is forwarded after the child exited.
///
/// A grandchild that inherited the pipes keeps them open, so the readers may never see EOF.
const OUTPUT_GRACE: Duration = Duration::from_millis(100);

/// How a subprocess ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Builder for a subprocess task.
///
/// ```rust
/// use throttle_core::Task;
/// use throttle_exec::SubprocessTask;
/// use throttle_model::Flag;
///
/// let task = SubprocessTask::new("sh")
///     .name("greet")
///     .args(["-c", "echo hello"])
///     .env("LANG", "C")
///     .fail_on_non_zero(Flag::enabled())
///     .build()
///     .unwrap();
/// assert_eq!(task.name(), "greet");
/// ```
#[derive(Debug, Clone)]
pub struct SubprocessTask {
    cfg: SubprocessConfig,
}

impl SubprocessTask {
    /// Start describing `command`. The task is named after the command unless [`Self::name`] is set.
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        Self {
            cfg: SubprocessConfig {
                name: command.clone(),
                command,
                args: Vec::new(),
                env: Vec::new(),
                cwd: None,
                fail_on_non_zero: Flag::enabled(),
                log: LogConfig::default(),
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.cfg.name = name.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.cfg.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment variable on top of the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cfg.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.cwd = Some(dir.into());
        self
    }

    /// Treat a non-zero exit as [`TaskError::Fail`] (enabled by default).
    pub fn fail_on_non_zero(mut self, flag: Flag) -> Self {
        self.cfg.fail_on_non_zero = flag;
        self
    }

    pub fn log(mut self, log: LogConfig) -> Self {
        self.cfg.log = log;
        self
    }

    /// Validate the description and produce a runnable task.
    pub fn build(self) -> Result<TaskRef<ProcessExit>, ExecError> {
        self.cfg.validate()?;
        self.cfg.trace_state();
        Ok(Box::new(Subprocess { cfg: self.cfg }))
    }
}

/// Validated subprocess, ready to be admitted by a runner.
struct Subprocess {
    cfg: SubprocessConfig,
}

impl Task<ProcessExit> for Subprocess {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    fn run(self: Box<Self>, ctx: TaskContext) -> BoxTaskFuture<ProcessExit> {
        Box::pin(run_subprocess(self.cfg, ctx))
    }
}

async fn run_subprocess(cfg: SubprocessConfig, ctx: TaskContext) -> Result<ProcessExit, TaskError> {
    trace!(task = %cfg.name, id = %ctx.id(), "spawning subprocess");

    let mut cmd = Command::new(&cfg.command);
    cmd.args(&cfg.args)
        .envs(cfg.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = &cfg.cwd {
        cmd.current_dir(cwd);
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| TaskError::fail(format!("spawn failed: {e}")))?;

    let pumps: Vec<JoinHandle<()>> = [
        child
            .stdout
            .take()
            .map(|r| tokio::spawn(pump(r, Stream::Stdout, cfg.name.clone(), cfg.log))),
        child
            .stderr
            .take()
            .map(|r| tokio::spawn(pump(r, Stream::Stderr, cfg.name.clone(), cfg.log))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let result = tokio::select! {
        res = child.wait() => match res {
            Ok(status) => {
                let exit = ProcessExit { code: status.code() };
                if !exit.success() && cfg.fail_on_non_zero.is_enabled() {
                    Err(TaskError::fail(format!("process {exit}")))
                } else {
                    debug!(task = %cfg.name, %exit, "subprocess exited");
                    Ok(exit)
                }
            }
            Err(e) => Err(TaskError::fail(format!("wait failed: {e}"))),
        },
        _ = ctx.cancelled() => {
            debug!(task = %cfg.name, "cancellation requested; killing subprocess");
            if let Err(e) = child.kill().await {
                debug!(task = %cfg.name, error = %e, "failed to kill subprocess");
            }
            Err(TaskError::Canceled)
        }
    };

    let grace = match result {
        Err(TaskError::Canceled) => Duration::ZERO,
        _ => OUTPUT_GRACE,
    };
    drain(pumps, grace).await;
    result
}

/// Let the output readers finish within `grace`, then drop whatever is left.
async fn drain(pumps: Vec<JoinHandle<()>>, grace: Duration) {
    let deadline = Instant::now() + grace;
    for mut p in pumps {
        if tokio::time::timeout_at(deadline, &mut p).await.is_err() {
            trace!("output still open after the child exited; detaching reader");
            p.abort();
        }
    }
}

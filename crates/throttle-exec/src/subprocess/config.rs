use std::{fmt, path::PathBuf};

use throttle_model::Flag;
use tracing::trace;

use crate::ExecError;

/// How child output is forwarded into `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Lines longer than this (in bytes) are cut.
    pub max_line_length: usize,
    /// Log stdout at INFO (otherwise DEBUG).
    pub stdout_info: bool,
    /// Log stderr at WARN (otherwise DEBUG).
    pub stderr_warn: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stdout_info: true,
            stderr_warn: true,
        }
    }
}

/// Resolved subprocess configuration.
#[derive(Debug, Clone)]
pub(crate) struct SubprocessConfig {
    pub(crate) name: String,
    pub(crate) command: String,
    pub(crate) args: Vec<String>,
    pub(crate) env: Vec<(String, String)>,
    pub(crate) cwd: Option<PathBuf>,
    pub(crate) fail_on_non_zero: Flag,
    pub(crate) log: LogConfig,
}

impl SubprocessConfig {
    /// Rules:
    /// - `command` is not blank;
    /// - env keys are not empty and contain no `=`;
    /// - `log.max_line_length` is positive.
    pub(crate) fn validate(&self) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidSpec("subprocess command is empty".into()));
        }
        if let Some((key, _)) = self
            .env
            .iter()
            .find(|(k, _)| k.is_empty() || k.contains('='))
        {
            return Err(ExecError::InvalidSpec(format!(
                "invalid environment variable name: {key:?}"
            )));
        }
        if self.log.max_line_length == 0 {
            return Err(ExecError::InvalidSpec(
                "log.max_line_length must be positive".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn trace_state(&self) {
        trace!(
            task = %self.name,
            command = %self.command,
            args = ?self.args,
            cwd = ?self.cwd,
            env_len = self.env.len(),
            fail_on_non_zero = self.fail_on_non_zero.is_enabled(),
            "subprocess config resolved"
        );
    }
}

impl fmt::Display for SubprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (args={}, env={}, cwd={:?}, fail_on_non_zero={})",
            self.name,
            self.command,
            self.args.len(),
            self.env.len(),
            self.cwd,
            self.fail_on_non_zero.is_enabled(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: &str) -> SubprocessConfig {
        SubprocessConfig {
            name: "t".into(),
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            fail_on_non_zero: Flag::enabled(),
            log: LogConfig::default(),
        }
    }

    #[test]
    fn blank_command_is_rejected() {
        assert!(config("  ").validate().is_err());
        assert!(config("ls").validate().is_ok());
    }

    #[test]
    fn malformed_env_key_is_rejected() {
        let mut cfg = config("env");
        cfg.env.push(("A=B".into(), "1".into()));
        assert!(matches!(cfg.validate(), Err(ExecError::InvalidSpec(_))));
    }

    #[test]
    fn zero_line_length_is_rejected() {
        let mut cfg = config("ls");
        cfg.log.max_line_length = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn display_is_compact() {
        let mut cfg = config("ls");
        cfg.args = vec!["-la".into()];
        assert_eq!(
            cfg.to_string(),
            "t: ls (args=1, env=0, cwd=None, fail_on_non_zero=true)"
        );
    }
}

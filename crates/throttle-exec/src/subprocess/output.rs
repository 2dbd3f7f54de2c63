use std::borrow::Cow;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info, warn};

use super::LogConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

/// Forward every line of `reader` into `tracing` until EOF.
pub(crate) async fn pump<R>(reader: R, stream: Stream, task: String, cfg: LogConfig)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => emit(&task, stream, &truncate(&line, cfg.max_line_length), cfg),
            Ok(None) => break,
            Err(e) => {
                debug!(task = %task, stream = stream.as_str(), error = %e, "output stream closed");
                break;
            }
        }
    }
}

fn emit(task: &str, stream: Stream, line: &str, cfg: LogConfig) {
    let s = stream.as_str();
    match stream {
        Stream::Stdout if cfg.stdout_info => info!(task, stream = s, "{line}"),
        Stream::Stderr if cfg.stderr_warn => warn!(task, stream = s, "{line}"),
        _ => debug!(task, stream = s, "{line}"),
    }
}

/// Cut `line` to at most `max` bytes on a char boundary, marking the cut with `…`.
pub(crate) fn truncate(line: &str, max: usize) -> Cow<'_, str> {
    if line.len() <= max {
        return Cow::Borrowed(line);
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}…", &line[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_are_borrowed() {
        assert!(matches!(truncate("ok", 10), Cow::Borrowed("ok")));
    }

    #[test]
    fn long_lines_are_cut_on_char_boundary() {
        assert_eq!(truncate("abcdef", 3), "abc…");
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate("aébc", 2), "a…");
    }

    #[tokio::test]
    async fn pump_reads_until_eof() {
        let input: &[u8] = b"one\ntwo\n";
        pump(input, Stream::Stdout, "t".into(), LogConfig::default()).await;
    }
}

use std::fmt;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::logger::object::LoggerTimeZone;

/// RFC 3339 timestamps in the configured timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerRfc3339 {
    tz: LoggerTimeZone,
}

impl LoggerRfc3339 {
    pub fn new(tz: LoggerTimeZone) -> Self {
        Self { tz }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.tz.offset())
    }
}

impl FormatTime for LoggerRfc3339 {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match self.now().format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => write!(w, "<invalid-time> "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_utc_timestamp() {
        let mut out = String::new();
        LoggerRfc3339::new(LoggerTimeZone::Utc)
            .format_time(&mut Writer::new(&mut out))
            .unwrap();

        let ts = out.trim_end();
        assert!(out.ends_with(' '), "timestamp is followed by a separator");
        assert!(ts.ends_with('Z'), "utc timestamp must end with Z: {ts}");

        // YYYY-MM-DDTHH:MM:SS[.fraction]Z
        let bytes = ts.as_bytes();
        assert!(ts.len() >= 20, "too short: {ts}");
        assert_eq!((bytes[4], bytes[7], bytes[10]), (b'-', b'-', b'T'));
        assert_eq!((bytes[13], bytes[16]), (b':', b':'));
        assert!(ts[..4].bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn local_timestamp_carries_the_local_offset() {
        let mut out = String::new();
        LoggerRfc3339::new(LoggerTimeZone::Local)
            .format_time(&mut Writer::new(&mut out))
            .unwrap();

        let ts = out.trim_end();
        if LoggerTimeZone::Local.offset().is_utc() {
            assert!(ts.ends_with('Z'), "{ts}");
        } else {
            assert!(ts[ts.len() - 6..].starts_with(['+', '-']), "{ts}");
        }
    }
}

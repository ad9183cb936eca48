//! Text line layout shared by the console and file sinks.
//!
//! ```text
//! time="2026-10-17T09:05:03+08:00" level=info msg="resp: ok" K_ENV=prod K_LEVEL=Info K_LOGID=20261017090503000042a1f3
//! ```

use std::fmt::Write as FmtWrite;

use crate::engine::record::LogRecord;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Render a record as one logfmt-style line, without a trailing newline.
pub fn format_line(record: &LogRecord) -> String {
    let mut line = format!(
        "time=\"{}\" level={} msg={:?}",
        record.timestamp.format(TIME_FORMAT),
        record.level,
        record.message
    );
    if let Some(env) = record.environment {
        let _ = write!(line, " K_ENV={}", env);
    }
    let _ = write!(line, " K_LEVEL={}", record.level.tag());
    if let Some(log_id) = &record.log_id {
        let _ = write!(line, " K_LOGID={}", log_id);
    }
    line
}

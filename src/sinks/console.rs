//! Console sink: the default destination in every environment.

use std::io::Write;

use crate::engine::record::LogRecord;
use crate::sinks::format::format_line;
use crate::sinks::Sink;

/// Writes one text line per record to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn deliver(&self, record: &LogRecord) {
        // The stderr lock keeps concurrent lines from interleaving.
        let mut out = std::io::stderr().lock();
        let _ = writeln!(out, "{}", format_line(record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().lock().flush();
    }
}

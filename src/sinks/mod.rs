//! Log destinations.
//!
//! # Data Flow
//! ```text
//! Engine dispatch
//!     → SinkLayer (level set check)
//!     → Sink::deliver(&LogRecord)
//!         → console.rs (stderr text lines)
//!         → file.rs    (hourly rotating file + stable alias)
//!         → gelf.rs    (GELF over UDP to a remote collector)
//!         → mail.rs    (SMTP alert per recipient)
//!         → memory.rs  (in-process capture for tests)
//! ```
//!
//! # Design Decisions
//! - Every sink is responsible for its own thread safety
//! - Delivery is fire-and-forget: errors are swallowed, never returned
//! - Sinks never log about themselves (that would recurse into the engine)

pub mod console;
pub mod file;
pub mod format;
pub mod gelf;
pub mod mail;
pub mod memory;

use serde::Serialize;

use crate::engine::record::LogRecord;

pub use console::ConsoleSink;
pub use file::RotatingFile;
pub use gelf::GelfSink;
pub use mail::MailSink;
pub use memory::MemorySink;

/// A destination for log records.
pub trait Sink: Send + Sync {
    /// Deliver one record, best effort.
    fn deliver(&self, record: &LogRecord);

    /// Push buffered output out. Called before the process terminates.
    fn flush(&self) {}
}

/// Kind of an attached sink, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Console,
    File,
    Remote,
    Mail,
    Memory,
}

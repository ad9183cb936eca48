//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     LogConfig → SinkPlan → Build sinks → Build engine → Replay notes
//!         → Install as process-wide logger
//!
//! Shutdown (shutdown.rs):
//!     Fatal record → Flush sinks → Exit(1)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: plan first, then sinks, then the engine
//! - Notes raised before the engine exists are replayed through it
//! - Fail fast: an unknown environment or unopenable log file is fatal

pub mod shutdown;
pub mod startup;

pub use shutdown::{Fatal, FATAL_EXIT_CODE};
pub use startup::{
    initialize, initialize_global, initialize_global_or_exit, initialize_with, plan, Bootstrap,
    DefaultSinkFactory, FilePlan, MailPlan, RemotePlan, SinkFactory, SinkPlan,
};

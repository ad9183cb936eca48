//! Leveled, context-propagated logging.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ── FlowContext (log id, env) ──┐
//!                                         ▼
//!                                   ┌──────────┐     ┌───────────────────────────┐
//!                                   │  Logger  │────▶│ Engine (tracing Dispatch) │
//!                                   │  facade  │     │  min level → SinkLayers   │
//!                                   └──────────┘     └─────────────┬─────────────┘
//!                                                                  │
//!                 ┌─────────────┬──────────────────┬───────────────┼──────────────┐
//!                 ▼             ▼                  ▼               ▼              ▼
//!             console      rotating file       GELF (UDP)      mail (SMTP)     memory
//! ```
//!
//! Bootstrap (`lifecycle::startup`) chooses the sinks from a `LogConfig`
//! according to the deployment environment and installs the result as the
//! process-wide logger (`global`).

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod sinks;

pub use config::{load_config, LogConfig, MailBotConfig};
pub use context::{with_log_id, Environment, FlowContext, LogId};
pub use engine::global;
pub use engine::level::{Level, LevelSet};
pub use engine::record::LogRecord;
pub use engine::{Engine, EngineBuilder, SinkInfo};
pub use error::{Error, Result};
pub use lifecycle::{Bootstrap, Fatal};
pub use logger::Logger;
pub use sinks::{Sink, SinkKind};

/// Target of every event emitted by the facade.
pub const TARGET: &str = "flowlog";

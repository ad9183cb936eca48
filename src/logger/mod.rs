//! Logger facade.
//!
//! # Responsibilities
//! - Expose one operation per level, each taking the caller's `FlowContext`
//! - Stamp the context's log id and environment onto every record
//! - Terminate the process after a fatal record has reached the sinks
//!
//! # Design Decisions
//! - Loggers are injected; the global one is reached through the macros
//! - Formatting goes through `format_args!`, never through a runtime template
//! - No buffering: a record is delivered before the call returns

#[macro_use]
mod macros;

use std::fmt;

use crate::context::FlowContext;
use crate::engine::level::Level;
use crate::engine::Engine;
use crate::lifecycle::shutdown::Fatal;

/// Leveled logging over one engine.
#[derive(Debug, Clone)]
pub struct Logger {
    engine: Engine,
}

impl Logger {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn log(&self, level: Level, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        self.engine.emit(level, ctx, args);
    }

    pub fn debug(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, ctx, args);
    }

    pub fn info(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        self.log(Level::Info, ctx, args);
    }

    pub fn warn(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, ctx, args);
    }

    pub fn error(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        self.log(Level::Error, ctx, args);
    }

    /// Log at fatal level and flush every sink.
    ///
    /// The returned signal must be acted on; [`Fatal::exit`] ends the process.
    pub fn emit_fatal(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) -> Fatal {
        self.log(Level::Fatal, ctx, args);
        self.engine.flush();
        Fatal::new()
    }

    /// Log at fatal level, flush, and terminate the process.
    pub fn fatal(&self, ctx: &FlowContext, args: fmt::Arguments<'_>) -> ! {
        self.emit_fatal(ctx, args).exit()
    }
}

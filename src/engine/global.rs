//! Process-wide engine.
//!
//! Before bootstrap installs an engine, every global lookup gets the
//! fallback: a console engine at Debug level, built on first use. Once an
//! engine is installed it is returned for the rest of the process.
//!
//! Code that can take a [`Logger`] by injection should; the global exists
//! for the macros and for code far from any constructor.

use std::sync::OnceLock;

use crate::engine::level::Level;
use crate::engine::Engine;
use crate::error::Error;
use crate::logger::Logger;

static FALLBACK: OnceLock<Logger> = OnceLock::new();
static INSTALLED: OnceLock<Logger> = OnceLock::new();

/// The logger over [`current`].
pub fn logger() -> &'static Logger {
    match INSTALLED.get() {
        Some(logger) => logger,
        None => fallback(),
    }
}

/// The installed engine, or the fallback when none is installed yet.
pub fn current() -> &'static Engine {
    logger().engine()
}

/// The console engine used before bootstrap.
pub fn fallback() -> &'static Logger {
    FALLBACK.get_or_init(|| Logger::new(Engine::console(Level::Debug)))
}

/// Install `logger` as the process-wide logger.
///
/// Succeeds once; later calls leave the first logger in place.
pub fn install(logger: Logger) -> Result<(), Error> {
    INSTALLED.set(logger).map_err(|_| Error::AlreadyInstalled)
}

pub fn is_installed() -> bool {
    INSTALLED.get().is_some()
}

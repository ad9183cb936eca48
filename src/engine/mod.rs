//! Leveled logging engine.
//!
//! # Data Flow
//! ```text
//! Logger facade (level, FlowContext, message)
//!     → Engine::emit (minimum level check)
//!     → tracing::Dispatch
//!         → LevelFilter
//!         → SinkLayer per attached sink (level set check)
//!         → Sink::deliver
//! ```
//!
//! # Design Decisions
//! - The engine is a `tracing` subscriber; sinks are layers on a `Registry`
//! - Built once and immutable afterwards; no sink is added after build
//! - `Engine` is a cheap `Arc` handle, cloned into every logger
//! - The context travels as event fields (`severity`, `log_id`, `env`)

pub mod global;
pub mod layer;
pub mod level;
pub mod record;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::context::{FlowContext, LogId};
use crate::engine::layer::SinkLayer;
use crate::engine::level::{Level, LevelSet};
use crate::sinks::{ConsoleSink, Sink, SinkKind};

/// Description of an attached sink.
#[derive(Debug, Clone, Serialize)]
pub struct SinkInfo {
    pub kind: SinkKind,
    pub levels: LevelSet,
    pub description: String,
}

struct Attached {
    info: SinkInfo,
    sink: Arc<dyn Sink>,
}

struct EngineInner {
    min_level: Level,
    sinks: Vec<Attached>,
    dispatch: Dispatch,
}

/// Handle to a built engine.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// An engine writing every record at or above `min_level` to stderr.
    pub fn console(min_level: Level) -> Self {
        Self::builder()
            .min_level(min_level)
            .attach(
                SinkKind::Console,
                LevelSet::all(),
                Arc::new(ConsoleSink::stderr()),
                "stderr",
            )
            .build()
    }

    pub fn min_level(&self) -> Level {
        self.inner.min_level
    }

    /// Attached sinks, in attachment order.
    pub fn sinks(&self) -> impl Iterator<Item = &SinkInfo> + '_ {
        self.inner.sinks.iter().map(|attached| &attached.info)
    }

    pub fn has_sink(&self, kind: SinkKind) -> bool {
        self.sinks().any(|info| info.kind == kind)
    }

    /// The dispatcher behind this engine.
    ///
    /// Plain `tracing` events sent through it reach the same sinks.
    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    /// Hand one record to every sink that accepts `level`.
    pub fn emit(&self, level: Level, ctx: &FlowContext, args: fmt::Arguments<'_>) {
        if level < self.inner.min_level {
            return;
        }

        let severity = level.tag();
        let log_id = ctx.log_id().map(LogId::as_str);
        let env = ctx.environment().map(|e| e.as_str());

        tracing::dispatcher::with_default(&self.inner.dispatch, || match level {
            Level::Debug => tracing::event!(
                target: crate::TARGET,
                tracing::Level::DEBUG,
                severity,
                log_id,
                env,
                "{}",
                args
            ),
            Level::Info => tracing::event!(
                target: crate::TARGET,
                tracing::Level::INFO,
                severity,
                log_id,
                env,
                "{}",
                args
            ),
            Level::Warn => tracing::event!(
                target: crate::TARGET,
                tracing::Level::WARN,
                severity,
                log_id,
                env,
                "{}",
                args
            ),
            Level::Error | Level::Fatal => tracing::event!(
                target: crate::TARGET,
                tracing::Level::ERROR,
                severity,
                log_id,
                env,
                "{}",
                args
            ),
        });
    }

    /// Flush every attached sink.
    pub fn flush(&self) {
        for attached in &self.inner.sinks {
            attached.sink.flush();
        }
    }

    /// Whether both handles point at the same engine.
    pub fn ptr_eq(&self, other: &Engine) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("min_level", &self.inner.min_level)
            .field("sinks", &self.sinks().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects sinks before the engine is built.
pub struct EngineBuilder {
    min_level: Level,
    sinks: Vec<Attached>,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            min_level: Level::Info,
            sinks: Vec::new(),
        }
    }

    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Attach `sink` for the levels in `levels`.
    pub fn attach(
        mut self,
        kind: SinkKind,
        levels: LevelSet,
        sink: Arc<dyn Sink>,
        description: impl Into<String>,
    ) -> Self {
        self.sinks.push(Attached {
            info: SinkInfo {
                kind,
                levels,
                description: description.into(),
            },
            sink,
        });
        self
    }

    pub fn build(self) -> Engine {
        let layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = self
            .sinks
            .iter()
            .map(|attached| {
                SinkLayer::new(attached.info.levels, Arc::clone(&attached.sink)).boxed()
            })
            .collect();

        let subscriber = Registry::default()
            .with(layers)
            .with(LevelFilter::from_level(self.min_level.to_tracing()));

        Engine {
            inner: Arc::new(EngineInner {
                min_level: self.min_level,
                sinks: self.sinks,
                dispatch: Dispatch::new(subscriber),
            }),
        }
    }
}

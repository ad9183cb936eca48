//! Tracing layer that feeds one sink.
//!
//! Each attached sink gets its own `SinkLayer`; the layer turns events into
//! [`LogRecord`]s and applies the sink's level set before delivery.

use std::sync::Arc;

use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::engine::level::LevelSet;
use crate::engine::record::LogRecord;
use crate::sinks::Sink;

pub struct SinkLayer {
    levels: LevelSet,
    sink: Arc<dyn Sink>,
}

impl SinkLayer {
    pub fn new(levels: LevelSet, sink: Arc<dyn Sink>) -> Self {
        Self { levels, sink }
    }
}

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let record = LogRecord::from_event(event);
        if self.levels.contains(record.level) {
            self.sink.deliver(&record);
        }
    }
}

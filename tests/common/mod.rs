//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use flowlog::config::{LogConfig, MailBotConfig};
use flowlog::engine::level::{Level, LevelSet};
use flowlog::lifecycle::{FilePlan, RemotePlan, SinkFactory};
use flowlog::sinks::MemorySink;
use flowlog::{Engine, Error, Logger, Sink, SinkKind};

/// Factory handing out in-memory sinks so tests can see what bootstrap
/// attached and what each sink received.
#[derive(Default)]
pub struct RecordingFactory {
    pub console: Arc<MemorySink>,
    pub file: Arc<MemorySink>,
    pub remote: Arc<MemorySink>,
    pub mail: Mutex<Vec<(String, Arc<MemorySink>)>>,
    pub file_plans: Mutex<Vec<FilePlan>>,
    pub fail_file: bool,
    pub failing_recipients: Vec<String>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_file() -> Self {
        Self {
            fail_file: true,
            ..Self::default()
        }
    }

    pub fn failing_recipient(recipient: &str) -> Self {
        Self {
            failing_recipients: vec![recipient.to_string()],
            ..Self::default()
        }
    }

    /// Mail sink built for `recipient`, if any.
    pub fn mail_sink(&self, recipient: &str) -> Option<Arc<MemorySink>> {
        self.mail
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r == recipient)
            .map(|(_, sink)| sink.clone())
    }
}

impl SinkFactory for RecordingFactory {
    fn console(&self) -> Arc<dyn Sink> {
        self.console.clone()
    }

    fn file(&self, plan: &FilePlan) -> io::Result<Arc<dyn Sink>> {
        if self.fail_file {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.file_plans.lock().unwrap().push(plan.clone());
        Ok(self.file.clone())
    }

    fn remote(&self, _plan: &RemotePlan) -> Arc<dyn Sink> {
        self.remote.clone()
    }

    fn mail(&self, _bot: &MailBotConfig, recipient: &str) -> Result<Arc<dyn Sink>, Error> {
        if self.failing_recipients.iter().any(|r| r == recipient) {
            return Err(Error::MailSink {
                recipient: recipient.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let sink = Arc::new(MemorySink::new());
        self.mail
            .lock()
            .unwrap()
            .push((recipient.to_string(), sink.clone()));
        Ok(sink)
    }
}

pub fn config(env: &str) -> LogConfig {
    LogConfig {
        env: env.to_string(),
        ..LogConfig::default()
    }
}

pub fn with_file(mut config: LogConfig, dir: &str, name: &str) -> LogConfig {
    config.log_dir = dir.to_string();
    config.log_file_name = name.to_string();
    config
}

pub fn mail_bot(recipients: &[&str], enable: bool) -> MailBotConfig {
    MailBotConfig {
        name: "alert-bot".into(),
        smtp_server_ip: "smtp.example.com".into(),
        smtp_server_port: 25,
        from_mail_address: "bot@example.com".into(),
        to_mail_address_list: recipients.iter().map(|r| r.to_string()).collect(),
        username: "bot".into(),
        password: "secret".into(),
        enable,
    }
}

/// A logger writing every level into one memory sink.
pub fn memory_logger(min_level: Level) -> (Logger, Arc<MemorySink>) {
    let memory = Arc::new(MemorySink::new());
    let engine = Engine::builder()
        .min_level(min_level)
        .attach(SinkKind::Memory, LevelSet::all(), memory.clone(), "memory")
        .build();
    (Logger::new(engine), memory)
}

pub fn kinds(engine: &Engine) -> Vec<SinkKind> {
    engine.sinks().map(|info| info.kind).collect()
}

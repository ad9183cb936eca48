//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a `LogConfig` into a sink plan for its environment
//! - Build every planned sink and the engine over them
//! - Report what was and was not attached on the system context
//! - Install the result as the process-wide logger
//!
//! # Design Decisions
//! - Planning is a pure function; only building touches the outside world
//! - Fail fast: an unknown environment or unopenable log file is fatal
//! - The remote collector is never probed; a failing mail recipient is
//!   reported and skipped
//! - Notes are collected while there is no engine and replayed through it
//!   once it exists

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::config::{LogConfig, MailBotConfig};
use crate::context::{Environment, FlowContext};
use crate::engine::global;
use crate::engine::level::{Level, LevelSet};
use crate::engine::Engine;
use crate::error::Error;
use crate::logger::Logger;
use crate::sinks::{ConsoleSink, GelfSink, MailSink, RotatingFile, Sink, SinkKind};

/// Prefix of every message logged by bootstrap.
pub const NOTE_PREFIX: &str = "[bootstrap]";

static INIT_LOCK: Mutex<()> = Mutex::new(());

/// A message raised while planning, logged once the engine exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub level: Level,
    pub message: String,
}

impl Note {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Rotating file to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePlan {
    pub directory: PathBuf,
    pub base_name: String,
    /// 0 keeps rotated files forever.
    pub max_age_hours: u64,
}

impl FilePlan {
    /// Retention of rotated files; `None` keeps them forever.
    ///
    /// Ages too large to represent also keep files forever.
    pub fn max_age(&self) -> Option<chrono::Duration> {
        match self.max_age_hours {
            0 => None,
            hours => i64::try_from(hours).ok().and_then(chrono::Duration::try_hours),
        }
    }
}

/// Remote GELF collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemotePlan {
    pub host: String,
    pub port: u16,
}

/// Mail alert hooks, one per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailPlan {
    pub bot: MailBotConfig,
    pub recipients: Vec<String>,
}

/// What bootstrap will attach for a configuration.
#[derive(Debug, Clone, Serialize)]
pub struct SinkPlan {
    pub environment: Environment,
    pub min_level: Level,
    pub file: Option<FilePlan>,
    pub remote: Option<RemotePlan>,
    pub mail: Option<MailPlan>,
    #[serde(skip)]
    pub notes: Vec<Note>,
}

impl SinkPlan {
    fn new(environment: Environment, min_level: Level) -> Self {
        Self {
            environment,
            min_level,
            file: None,
            remote: None,
            mail: None,
            notes: Vec::new(),
        }
    }

    fn note(&mut self, level: Level, message: impl Into<String>) {
        self.notes.push(Note::new(level, message));
    }
}

/// Decide the sinks for `config` without touching the outside world.
pub fn plan(config: &LogConfig) -> Result<SinkPlan, Error> {
    let environment: Environment = config.env.parse()?;

    match environment {
        Environment::Dev | Environment::Test => {
            let mut plan = SinkPlan::new(environment, Level::Debug);
            plan.note(Level::Warn, "Logging in Debug Level");
            Ok(plan)
        }
        Environment::Prod => {
            let mut plan = SinkPlan::new(environment, Level::Info);
            plan.note(Level::Info, "Logging in Info Level");

            if config.file_configured() {
                let file = FilePlan {
                    directory: PathBuf::from(&config.log_dir),
                    base_name: config.log_file_name.clone(),
                    max_age_hours: config.log_max_age_hours,
                };
                plan.note(
                    Level::Info,
                    format!("log file: {}", file.directory.join(&file.base_name).display()),
                );
                plan.file = Some(file);
            } else {
                plan.note(Level::Warn, "no file hook");
            }

            if config.remote_configured() {
                plan.remote = Some(RemotePlan {
                    host: config.log_server_ip.clone(),
                    port: config.log_server_port,
                });
            } else {
                plan.note(Level::Warn, "no graylog hook");
            }

            let bot = &config.mail_bot;
            if !bot.is_complete() {
                plan.note(Level::Warn, "no mail hook");
            } else if bot.enable {
                plan.mail = Some(MailPlan {
                    bot: bot.clone(),
                    recipients: bot.to_mail_address_list.clone(),
                });
            } else {
                plan.note(Level::Info, "mail alerts disabled");
            }

            Ok(plan)
        }
        Environment::System => Err(Error::UnknownEnvironment(config.env.clone())),
    }
}

/// Builds the sinks named by a plan.
pub trait SinkFactory {
    fn console(&self) -> Arc<dyn Sink> {
        Arc::new(ConsoleSink::stderr())
    }

    fn file(&self, plan: &FilePlan) -> io::Result<Arc<dyn Sink>>;

    fn remote(&self, plan: &RemotePlan) -> Arc<dyn Sink>;

    fn mail(&self, bot: &MailBotConfig, recipient: &str) -> Result<Arc<dyn Sink>, Error>;
}

/// Factory for the real sinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSinkFactory;

impl SinkFactory for DefaultSinkFactory {
    fn file(&self, plan: &FilePlan) -> io::Result<Arc<dyn Sink>> {
        let file = RotatingFile::open(&plan.directory, plan.base_name.as_str(), plan.max_age())?;
        Ok(Arc::new(file))
    }

    fn remote(&self, plan: &RemotePlan) -> Arc<dyn Sink> {
        Arc::new(GelfSink::new(&plan.host, plan.port))
    }

    fn mail(&self, bot: &MailBotConfig, recipient: &str) -> Result<Arc<dyn Sink>, Error> {
        Ok(Arc::new(MailSink::connect(bot, recipient)?))
    }
}

/// A bootstrapped logger.
#[derive(Debug)]
pub struct Bootstrap {
    pub logger: Logger,
    /// Context for process-level records.
    pub system: FlowContext,
    pub plan: SinkPlan,
}

/// Build a logger for `config` with the real sinks.
///
/// Touches no global state.
pub fn initialize(config: &LogConfig) -> Result<Bootstrap, Error> {
    initialize_with(config, &DefaultSinkFactory)
}

/// Build a logger for `config`, creating sinks through `factory`.
pub fn initialize_with(config: &LogConfig, factory: &dyn SinkFactory) -> Result<Bootstrap, Error> {
    let mut plan = plan(config)?;

    let mut builder = Engine::builder().min_level(plan.min_level).attach(
        SinkKind::Console,
        LevelSet::all(),
        factory.console(),
        "stderr",
    );

    if let Some(file) = &plan.file {
        let sink = factory.file(file).map_err(|source| Error::FileSink {
            dir: file.directory.clone(),
            source,
        })?;
        builder = builder.attach(
            SinkKind::File,
            LevelSet::at_least(Level::Info),
            sink,
            file.directory.join(&file.base_name).display().to_string(),
        );
    }

    if let Some(remote) = &plan.remote {
        builder = builder.attach(
            SinkKind::Remote,
            LevelSet::all(),
            factory.remote(remote),
            format!("gelf://{}:{}", remote.host, remote.port),
        );
    }

    let mut failures = Vec::new();
    if let Some(mail) = &plan.mail {
        for recipient in &mail.recipients {
            match factory.mail(&mail.bot, recipient) {
                Ok(sink) => {
                    builder = builder.attach(
                        SinkKind::Mail,
                        LevelSet::at_least(Level::Error),
                        sink,
                        format!("mailto:{}", recipient),
                    );
                }
                Err(e) => failures.push(Note::new(Level::Error, e.to_string())),
            }
        }
    }
    plan.notes.extend(failures);

    let logger = Logger::new(builder.build());
    let system = FlowContext::system();

    logger.debug(&system, format_args!("{} init engine success", NOTE_PREFIX));
    for note in &plan.notes {
        logger.log(
            note.level,
            &system,
            format_args!("{} {}", NOTE_PREFIX, note.message),
        );
    }

    Ok(Bootstrap {
        logger,
        system,
        plan,
    })
}

/// Bootstrap and install the process-wide logger.
///
/// Returns the system context on success.
pub fn initialize_global(config: &LogConfig) -> Result<FlowContext, Error> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    if global::is_installed() {
        return Err(Error::AlreadyInstalled);
    }

    let bootstrap = initialize(config)?;
    global::install(bootstrap.logger)?;
    Ok(bootstrap.system)
}

/// Like [`initialize_global`], exiting the process on a fatal error.
///
/// A second call logs an error and keeps the logger installed first.
pub fn initialize_global_or_exit(config: &LogConfig) -> FlowContext {
    match initialize_global(config) {
        Ok(system) => system,
        Err(Error::AlreadyInstalled) => {
            let system = FlowContext::system();
            global::logger().error(
                &system,
                format_args!("{} {}", NOTE_PREFIX, Error::AlreadyInstalled),
            );
            system
        }
        Err(e) => global::fallback().fatal(
            &FlowContext::system(),
            format_args!("{} {}", NOTE_PREFIX, e),
        ),
    }
}

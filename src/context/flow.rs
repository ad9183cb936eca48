//! Flow context carried through call chains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::id::LogId;
use crate::error::Error;

/// Declared deployment mode of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Process bootstrap, before any request exists.
    #[serde(rename = "sys", alias = "system")]
    System,
    Dev,
    Prod,
    /// Load testing.
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::System => "sys",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sys" | "system" => Ok(Environment::System),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            "test" => Ok(Environment::Test),
            other => Err(Error::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Immutable, request-scoped carrier of the log id and environment tag.
///
/// Contexts are passed by value (or reference) down a call chain and only
/// ever extended by deriving a new one; a derived context never affects
/// its parent or siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowContext {
    log_id: Option<LogId>,
    environment: Option<Environment>,
}

impl FlowContext {
    /// Start a new flow with a fresh log id and no environment tag.
    pub fn new_flow() -> Self {
        Self::default().with_log_id()
    }

    /// The context of process bootstrap.
    pub fn system() -> Self {
        Self::for_environment(Environment::System)
    }

    /// Start a new flow tagged with `env`.
    pub fn for_environment(env: Environment) -> Self {
        Self::new_flow().with_environment(env)
    }

    /// Start a new flow tagged with the environment named `name`.
    ///
    /// An unrecognized name is a fatal configuration error.
    pub fn for_environment_name(name: &str) -> Result<Self, Error> {
        Ok(Self::for_environment(name.parse()?))
    }

    /// Adopt a log id received from an upstream caller.
    pub fn from_log_id(log_id: LogId) -> Self {
        Self {
            log_id: Some(log_id),
            environment: None,
        }
    }

    /// Attach a log id unless one is already present.
    ///
    /// Idempotent: nested boundaries that call this again keep the id of
    /// the outermost one.
    pub fn with_log_id(self) -> Self {
        if self.log_id.is_some() {
            return self;
        }
        Self {
            log_id: Some(LogId::generate()),
            ..self
        }
    }

    /// Derive a context carrying `env`.
    pub fn with_environment(&self, env: Environment) -> Self {
        Self {
            log_id: self.log_id.clone(),
            environment: Some(env),
        }
    }

    pub fn log_id(&self) -> Option<&LogId> {
        self.log_id.as_ref()
    }

    pub fn environment(&self) -> Option<Environment> {
        self.environment
    }
}

/// Attach a log id to `parent`, or to an empty context if there is none.
pub fn with_log_id(parent: Option<FlowContext>) -> FlowContext {
    parent.unwrap_or_default().with_log_id()
}

//! Crate-wide error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while bootstrapping or installing the logging engine.
///
/// Logging calls themselves never return errors; these only surface from
/// startup paths.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured environment is not one of dev, prod or test.
    #[error("config env: {0:?} error")]
    UnknownEnvironment(String),

    /// The rotating log file could not be opened.
    #[error("init rotating log file in {dir} error: {source}")]
    FileSink {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mail alert hook could not be built for one recipient.
    #[error("connect to mail server for {recipient} error: {reason}")]
    MailSink { recipient: String, reason: String },

    /// A process-wide engine has already been installed.
    #[error("a logging engine is already installed")]
    AlreadyInstalled,
}

impl Error {
    /// Whether this error must stop the process when it happens at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnknownEnvironment(_) | Error::FileSink { .. })
    }
}

/// Result alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::UnknownEnvironment("staging".into()).is_fatal());
        assert!(Error::FileSink {
            dir: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .is_fatal());
        assert!(!Error::MailSink {
            recipient: "ops@example.com".into(),
            reason: "refused".into(),
        }
        .is_fatal());
        assert!(!Error::AlreadyInstalled.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnknownEnvironment("staging".into());
        assert_eq!(err.to_string(), "config env: \"staging\" error");
    }
}

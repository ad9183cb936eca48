//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the environment is one bootstrap accepts
//! - Reject values that can never produce a working sink
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Missing sink parameters are not errors; they disable the sink

use std::fmt;

use crate::config::schema::LogConfig;
use crate::context::Environment;

/// Longest accepted retention of rotated log files: 100 years.
pub const MAX_LOG_AGE_HOURS: u64 = 100 * 366 * 24;

/// A semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `env` is not dev, prod or test.
    UnknownEnvironment(String),
    /// `log_file_name` contains a path separator.
    FileNameHasSeparator(String),
    /// An entry of `to_mail_address_list` is blank.
    BlankRecipient(usize),
    /// `log_max_age_hours` exceeds [`MAX_LOG_AGE_HOURS`].
    MaxAgeOutOfRange(u64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownEnvironment(env) => {
                write!(f, "env {:?} is not one of dev, prod, test", env)
            }
            ValidationError::FileNameHasSeparator(name) => {
                write!(f, "log_file_name {:?} must not contain a path separator", name)
            }
            ValidationError::BlankRecipient(index) => {
                write!(f, "to_mail_address_list[{}] is blank", index)
            }
            ValidationError::MaxAgeOutOfRange(hours) => {
                write!(
                    f,
                    "log_max_age_hours {} exceeds the maximum of {}",
                    hours, MAX_LOG_AGE_HOURS
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.env.parse::<Environment>() {
        Ok(Environment::Dev | Environment::Prod | Environment::Test) => {}
        _ => errors.push(ValidationError::UnknownEnvironment(config.env.clone())),
    }

    if config.log_file_name.contains(['/', '\\']) {
        errors.push(ValidationError::FileNameHasSeparator(
            config.log_file_name.clone(),
        ));
    }

    if config.log_max_age_hours > MAX_LOG_AGE_HOURS {
        errors.push(ValidationError::MaxAgeOutOfRange(config.log_max_age_hours));
    }

    for (index, recipient) in config.mail_bot.to_mail_address_list.iter().enumerate() {
        if recipient.trim().is_empty() {
            errors.push(ValidationError::BlankRecipient(index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(env: &str) -> LogConfig {
        LogConfig {
            env: env.to_string(),
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_accepts_deployment_environments() {
        for env in ["dev", "prod", "test"] {
            assert_eq!(validate_config(&config(env)), Ok(()));
        }
    }

    #[test]
    fn test_rejects_system_and_unknown() {
        for env in ["sys", "staging", ""] {
            let errors = validate_config(&config(env)).unwrap_err();
            assert_eq!(errors, vec![ValidationError::UnknownEnvironment(env.to_string())]);
        }
    }

    #[test]
    fn test_max_age_bound() {
        let mut config = config("prod");
        config.log_max_age_hours = MAX_LOG_AGE_HOURS;
        assert_eq!(validate_config(&config), Ok(()));

        for hours in [MAX_LOG_AGE_HOURS + 1, 3_000_000_000, u64::MAX] {
            config.log_max_age_hours = hours;
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::MaxAgeOutOfRange(hours)])
            );
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = config("qa");
        config.log_file_name = "logs/app.log".into();
        config.mail_bot.to_mail_address_list = vec!["a@example.com".into(), "  ".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::BlankRecipient(1)));
        assert!(errors[1].to_string().contains("path separator"));
    }
}

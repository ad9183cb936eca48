//! Configuration schema definitions.
//!
//! Field names follow the JSON layout of existing deployment files.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Deployment environment: "dev", "prod" or "test".
    pub env: String,

    /// Directory of the rotating log file.
    pub log_dir: String,

    /// Base name of the rotating log file; also the name of its alias.
    pub log_file_name: String,

    /// Remote collector host.
    pub log_server_ip: String,

    /// Remote collector port (0 = unset).
    pub log_server_port: u16,

    /// Rotated files older than this are purged (0 = keep forever).
    pub log_max_age_hours: u64,

    /// Mail alert settings.
    pub mail_bot: MailBotConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            env: String::new(),
            log_dir: String::new(),
            log_file_name: String::new(),
            log_server_ip: String::new(),
            log_server_port: 0,
            log_max_age_hours: 7 * 24,
            mail_bot: MailBotConfig::default(),
        }
    }
}

impl LogConfig {
    /// Both file parameters are present.
    pub fn file_configured(&self) -> bool {
        !self.log_dir.is_empty() && !self.log_file_name.is_empty()
    }

    /// Both remote collector parameters are present.
    pub fn remote_configured(&self) -> bool {
        !self.log_server_ip.is_empty() && self.log_server_port != 0
    }
}

/// Mail alert bot configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MailBotConfig {
    /// Display name of the bot; also the subject prefix.
    pub name: String,

    /// SMTP server host.
    pub smtp_server_ip: String,

    /// SMTP server port (0 = unset).
    pub smtp_server_port: u16,

    /// Sender address.
    pub from_mail_address: String,

    /// One alert hook is built per recipient.
    pub to_mail_address_list: Vec<String>,

    /// SMTP user name.
    pub username: String,

    /// SMTP password. Never written back out.
    #[serde(skip_serializing)]
    pub password: String,

    /// Alerts are only sent when explicitly enabled.
    pub enable: bool,
}

impl MailBotConfig {
    /// Every parameter needed to build a mail hook is present.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.smtp_server_ip.is_empty()
            && self.smtp_server_port != 0
            && !self.from_mail_address.is_empty()
            && !self.username.is_empty()
            && !self.password.is_empty()
            && !self.to_mail_address_list.is_empty()
    }
}

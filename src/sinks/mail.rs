//! E-mail alert sink.
//!
//! One sink per recipient; construction probes the SMTP server so an
//! unreachable server is reported at bootstrap rather than on the first
//! alert.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, Message, SmtpTransport, Transport};

use crate::config::MailBotConfig;
use crate::engine::record::LogRecord;
use crate::error::Error;
use crate::sinks::Sink;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends each record as a plain-text mail to one recipient.
pub struct MailSink {
    bot_name: String,
    from: Mailbox,
    to: Mailbox,
    transport: SmtpTransport,
}

impl MailSink {
    /// Build a sink for `recipient` and check that the SMTP server answers.
    pub fn connect(bot: &MailBotConfig, recipient: &str) -> Result<Self, Error> {
        let fail = |reason: String| Error::MailSink {
            recipient: recipient.to_string(),
            reason,
        };

        let (from, to) = mailboxes(bot, recipient).map_err(fail)?;
        let tls = TlsParameters::new(bot.smtp_server_ip.clone()).map_err(|e| fail(e.to_string()))?;
        let transport = SmtpTransport::builder_dangerous(bot.smtp_server_ip.as_str())
            .port(bot.smtp_server_port)
            .credentials(Credentials::new(bot.username.clone(), bot.password.clone()))
            .tls(Tls::Opportunistic(tls))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        match transport.test_connection() {
            Ok(true) => {}
            Ok(false) => return Err(fail("server refused the connection".to_string())),
            Err(e) => return Err(fail(e.to_string())),
        }

        Ok(Self {
            bot_name: bot.name.clone(),
            from,
            to,
            transport,
        })
    }

    pub fn recipient(&self) -> &Mailbox {
        &self.to
    }
}

/// Sender and recipient mailboxes.
fn mailboxes(bot: &MailBotConfig, recipient: &str) -> Result<(Mailbox, Mailbox), String> {
    let from_address: Address = bot
        .from_mail_address
        .parse()
        .map_err(|e| format!("bad sender address {:?}: {}", bot.from_mail_address, e))?;
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| format!("bad recipient address {:?}: {}", recipient, e))?;
    Ok((Mailbox::new(Some(bot.name.clone()), from_address), to))
}

/// Subject line of an alert.
pub fn subject(bot_name: &str, record: &LogRecord) -> String {
    format!("{} - {}", bot_name, record.level)
}

/// Plain-text body of an alert.
pub fn body(record: &LogRecord) -> String {
    let mut body = format!(
        "Time: {}\r\nLevel: {}\r\n",
        record.timestamp.format("%Y%m%d %H:%M:%S"),
        record.level
    );
    if let Some(log_id) = &record.log_id {
        body.push_str(&format!("LogId: {}\r\n", log_id));
    }
    if let Some(env) = record.environment {
        body.push_str(&format!("Env: {}\r\n", env));
    }
    body.push_str(&format!("\r\nMessage: {}\r\n", record.message));
    body
}

impl Sink for MailSink {
    fn deliver(&self, record: &LogRecord) {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(&self.bot_name, record))
            .header(ContentType::TEXT_PLAIN)
            .body(body(record));
        if let Ok(message) = message {
            let _ = self.transport.send(&message);
        }
    }
}

//! Email alert forwarding
//!
//! Alerts render a handlebars template with the fields `From`, `To`,
//! `Subject` and `Message`, then hand the result to a [`MailTransport`].
//! [`AlertForwarder::send`] is the one place where panics raised while
//! rendering or sending are caught.

pub mod smtp;

pub use smtp::{SmtpTransport, TlsMode};

use crate::core::{LoggerError, Result};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Subject used for the secondary alert raised when a send panics
pub const SYSTEM_ALERT_SUBJECT: &str = "TraceLog Exception";

/// Default MIME message wrapping the alert text in an HTML body
pub const DEFAULT_EMAIL_TEMPLATE: &str = "From: {{From}}
To: {{To}}
Subject: {{Subject}}
MIME-version: 1.0
Content-Type: text/html; charset=\"UTF-8\"

<html><body>{{Message}}</body></html>";

const TEMPLATE_NAME: &str = "alert_email";

/// Mail server and recipients for alerts
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    /// Account name, also used as the sender address
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    pub to: Vec<String>,
    /// Handlebars template overriding [`DEFAULT_EMAIL_TEMPLATE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl EmailConfig {
    pub fn new<I, S>(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        to: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            to: to.into_iter().map(Into::into).collect(),
            template: None,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// `host:port` of the mail server
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("to", &self.to)
            .field("template", &self.template.is_some())
            .finish()
    }
}

/// A rendered message ready for delivery
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    pub from: &'a str,
    pub to: &'a [String],
    pub body: &'a str,
}

/// Capability to deliver a rendered alert
pub trait MailTransport: Send + Sync {
    fn send(&self, envelope: &Envelope<'_>) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AlertFields<'a> {
    from: &'a str,
    to: String,
    subject: &'a str,
    message: &'a str,
}

/// Renders and dispatches alerts for one [`EmailConfig`]
pub struct AlertForwarder {
    config: EmailConfig,
    templates: Handlebars<'static>,
    transport: Arc<dyn MailTransport>,
}

impl AlertForwarder {
    /// Compile the configured template and bind it to `transport`
    pub fn new(config: EmailConfig, transport: Arc<dyn MailTransport>) -> Result<Self> {
        if config.to.is_empty() {
            return Err(LoggerError::config("EmailConfig", "no alert recipients"));
        }

        let mut templates = Handlebars::new();
        templates.register_escape_fn(handlebars::no_escape);
        templates.register_template_string(
            TEMPLATE_NAME,
            config.template.as_deref().unwrap_or(DEFAULT_EMAIL_TEMPLATE),
        )?;

        Ok(Self {
            config,
            templates,
            transport,
        })
    }

    /// Forwarder delivering through [`SmtpTransport`]
    pub fn smtp(config: EmailConfig) -> Result<Self> {
        let transport = Arc::new(SmtpTransport::from_config(&config));
        Self::new(config, transport)
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Render the full message for `subject` and `message`
    pub fn render(&self, subject: &str, message: &str) -> Result<String> {
        let fields = AlertFields {
            from: &self.config.username,
            to: self.config.to.join(","),
            subject,
            message,
        };
        Ok(self.templates.render(TEMPLATE_NAME, &fields)?)
    }

    fn deliver(&self, subject: &str, message: &str) -> Result<()> {
        let body = self.render(subject, message)?;
        self.transport.send(&Envelope {
            from: &self.config.username,
            to: &self.config.to,
            body: &body,
        })
    }

    /// Render and send one alert.
    ///
    /// A panic during rendering or delivery does not unwind past this call:
    /// a secondary alert carrying the panic text and a backtrace is
    /// attempted, then `LoggerError::AlertPanicked` is returned.
    pub fn send(&self, subject: &str, message: &str) -> Result<()> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.deliver(subject, message))) {
            Ok(result) => result,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                let report = format!(
                    "send_alert : PANIC Deferred [{}] : Stack Trace : {}",
                    reason,
                    Backtrace::force_capture()
                );
                let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                    self.deliver(SYSTEM_ALERT_SUBJECT, &report)
                }));
                Err(LoggerError::AlertPanicked(reason))
            }
        }
    }
}

impl fmt::Debug for AlertForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertForwarder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

//! Log line structure and text template
//!
//! A rendered line looks like
//! `INFO: 2013/11/07 08:24:32 main.rs:13: main : main : Info : Hello Info`
//! with an optional trailing ` : <error>`.

use super::log_level::Severity;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;

/// Fixed tag written after the function name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Started,
    Completed,
    Info,
    Error,
    Alert,
    CompletedError,
    CompletedAlert,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Started => "Started",
            Tag::Completed => "Completed",
            Tag::Info => "Info",
            Tag::Error => "ERROR",
            Tag::Alert => "ALERT",
            Tag::CompletedError => "Completed : ERROR",
            Tag::CompletedAlert => "Completed : ALERT",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call's worth of log data, borrowed from the call site.
#[derive(Clone, Copy)]
pub struct LogLine<'a> {
    pub title: &'a str,
    pub function: &'a str,
    pub tag: Tag,
    pub message: Option<&'a dyn fmt::Display>,
    pub error: Option<&'a dyn fmt::Display>,
    pub location: &'static Location<'static>,
}

impl<'a> LogLine<'a> {
    /// Start a line attributed to the caller's source position
    #[track_caller]
    pub fn new(title: &'a str, function: &'a str, tag: Tag) -> Self {
        Self {
            title,
            function,
            tag,
            message: None,
            error: None,
            location: Location::caller(),
        }
    }

    pub fn with_message(mut self, message: &'a dyn fmt::Display) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_error(mut self, error: &'a dyn fmt::Display) -> Self {
        self.error = Some(error);
        self
    }

    /// Attribute the line to another source position, for wrapping helpers
    /// that want their own caller reported.
    pub fn at(mut self, location: &'static Location<'static>) -> Self {
        self.location = location;
        self
    }

    /// Replace newlines, carriage returns, and tabs with escape sequences
    /// so one call always produces exactly one physical line.
    fn sanitize(text: &str) -> String {
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// `<title> : <function> : <Tag>[ : <message>][ : <error>]`
    pub fn body(&self) -> String {
        let mut body = format!("{} : {} : {}", self.title, self.function, self.tag);
        if let Some(message) = self.message {
            body.push_str(" : ");
            body.push_str(&Self::sanitize(&message.to_string()));
        }
        if let Some(error) = self.error {
            body.push_str(" : ");
            body.push_str(&Self::sanitize(&error.to_string()));
        }
        body
    }

    /// Short file name and line of the call site, `main.rs:12`
    pub fn source_position(&self) -> String {
        let file = self.location.file();
        let short = Path::new(file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file);
        format!("{}:{}", short, self.location.line())
    }

    /// `<LABEL>: <timestamp> <file>:<line>: `
    pub fn prefix(
        &self,
        severity: Severity,
        timestamp_format: &TimestampFormat,
        now: &DateTime<Utc>,
        colored: bool,
    ) -> String {
        let mut prefix = String::with_capacity(48);
        let _ = write!(
            prefix,
            "{}: {} {}: ",
            Self::label(severity, colored),
            timestamp_format.format(now),
            self.source_position()
        );
        prefix
    }

    /// Full newline-terminated line including the severity prefix
    pub fn render(
        &self,
        severity: Severity,
        timestamp_format: &TimestampFormat,
        now: &DateTime<Utc>,
        colored: bool,
    ) -> String {
        let mut line = self.prefix(severity, timestamp_format, now, colored);
        line.push_str(&self.body());
        line.push('\n');
        line
    }

    #[cfg(feature = "console")]
    fn label(severity: Severity, colored: bool) -> String {
        use colored::Colorize;
        if colored {
            severity.to_str().color(severity.color_code()).to_string()
        } else {
            severity.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn label(severity: Severity, _colored: bool) -> String {
        severity.to_str().to_string()
    }
}

impl fmt::Debug for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogLine")
            .field("body", &self.body())
            .field("location", &self.source_position())
            .finish()
    }
}

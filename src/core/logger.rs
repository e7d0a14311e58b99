//! Main logger implementation
//!
//! A [`Logger`] is a cheap, clonable handle. Every write, every
//! reconfiguration and every read of the alert configuration goes through
//! one mutex, so no two calls can interleave bytes within a line on any sink.

use super::{
    config::LoggerConfig,
    error::Result,
    log_level::{LevelMask, Severity},
    log_line::{LogLine, Tag},
    metrics::LoggerMetrics,
    router::{Destination, Routes, Stream},
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::alert::{AlertForwarder, EmailConfig, MailTransport};
use crate::retention::RetentionPolicy;
use crate::sinks::{ConsoleSink, FileSink};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Title used for lines the logger writes about itself
pub const SYSTEM_TITLE: &str = "tracelog";

struct State {
    mask: LevelMask,
    routes: Routes,
    stdout: Box<dyn Sink>,
    stderr: Box<dyn Sink>,
    file: Option<Box<dyn Sink>>,
    file_path: Option<PathBuf>,
    forwarder: Option<Arc<AlertForwarder>>,
    transport: Option<Arc<dyn MailTransport>>,
    timestamp_format: TimestampFormat,
    colors: bool,
}

impl State {
    /// Write to every sink of `destination`. The file is written first;
    /// a failing sink does not stop the others.
    fn write(
        &mut self,
        destination: Destination,
        plain: &str,
        colored: Option<&str>,
        metrics: &LoggerMetrics,
    ) {
        let Some(stream) = destination.stream() else {
            metrics.record_discarded();
            return;
        };

        let mut failed = false;
        if destination.includes_file() {
            if let Some(file) = self.file.as_mut() {
                failed |= file.write_line(plain).is_err();
            }
        }

        let console = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        failed |= console.write_line(colored.unwrap_or(plain)).is_err();

        if failed {
            metrics.record_write_failure();
        } else {
            metrics.record_written();
        }
    }
}

struct Inner {
    state: Mutex<State>,
    metrics: LoggerMetrics,
}

/// Handle to one configured logger
///
/// # Example
///
/// ```
/// use tracelog::prelude::*;
///
/// let logger = Logger::start(LevelMask::TRACE);
///
/// logger.started("main", "example");
/// logger.info("main", "example", format_args!("processing {} items", 3));
/// logger.completed("main", "example");
///
/// logger.stop().unwrap();
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Console-only logger for `mask`
    pub fn start(mask: LevelMask) -> Self {
        LoggerBuilder::new().level(mask).assemble(None, None, None)
    }

    /// Console and file logger. Creates `<base_dir>/<YYYY-MM-DD>/` and a
    /// log file named after the start time, then sweeps old directories.
    ///
    /// Failure to create the directory or the file is returned; nothing
    /// is logged anywhere in that case.
    pub fn start_file(
        mask: LevelMask,
        base_dir: impl Into<PathBuf>,
        days_to_keep: u32,
    ) -> Result<Self> {
        LoggerBuilder::new()
            .level(mask)
            .file(base_dir, days_to_keep)
            .build()
    }

    /// [`Logger::start_file`], terminating the process with status 1 when
    /// the log directory or file cannot be created.
    pub fn start_file_or_exit(
        mask: LevelMask,
        base_dir: impl Into<PathBuf>,
        days_to_keep: u32,
    ) -> Self {
        match Self::start_file(mask, base_dir, days_to_keep) {
            Ok(logger) => logger,
            Err(err) => {
                eprintln!("{} : start_file : {}", SYSTEM_TITLE, err);
                std::process::exit(1);
            }
        }
    }

    /// Build a logger from a complete configuration
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        LoggerBuilder::from_config(config).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// The active level mask
    pub fn level(&self) -> LevelMask {
        self.inner.state.lock().mask
    }

    /// The resolved destination of every severity
    pub fn routes(&self) -> Routes {
        self.inner.state.lock().routes
    }

    /// Path of the open log file, if file logging was started from a
    /// base directory
    pub fn log_file(&self) -> Option<PathBuf> {
        self.inner.state.lock().file_path.clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    /// Write one line for `severity`.
    ///
    /// Every other logging call ends here. Sink failures are counted in
    /// [`Logger::metrics`] and never reported to the caller.
    pub fn emit(&self, severity: Severity, line: &LogLine<'_>) {
        let body = line.body();
        let now = Utc::now();

        let mut state = self.inner.state.lock();
        let destination = state.routes.get(severity);
        if destination.is_discard() {
            self.inner.metrics.record_discarded();
            return;
        }

        let plain = format!(
            "{}{}\n",
            line.prefix(severity, &state.timestamp_format, &now, false),
            body
        );
        let colored = state.colors.then(|| {
            format!(
                "{}{}\n",
                line.prefix(severity, &state.timestamp_format, &now, true),
                body
            )
        });
        state.write(destination, &plain, colored.as_deref(), &self.inner.metrics);
    }

    #[track_caller]
    pub fn trace(&self, title: &str, function: &str, message: impl Display) {
        self.emit(
            Severity::Trace,
            &LogLine::new(title, function, Tag::Info).with_message(&message),
        );
    }

    #[track_caller]
    pub fn info(&self, title: &str, function: &str, message: impl Display) {
        self.emit(
            Severity::Info,
            &LogLine::new(title, function, Tag::Info).with_message(&message),
        );
    }

    #[track_caller]
    pub fn warning(&self, title: &str, function: &str, message: impl Display) {
        self.emit(
            Severity::Warning,
            &LogLine::new(title, function, Tag::Info).with_message(&message),
        );
    }

    #[track_caller]
    pub fn error(&self, err: impl Display, title: &str, function: &str) {
        self.emit(
            Severity::Error,
            &LogLine::new(title, function, Tag::Error).with_error(&err),
        );
    }

    #[track_caller]
    pub fn error_with(
        &self,
        err: impl Display,
        title: &str,
        function: &str,
        message: impl Display,
    ) {
        self.emit(
            Severity::Error,
            &LogLine::new(title, function, Tag::Error)
                .with_message(&message)
                .with_error(&err),
        );
    }

    #[track_caller]
    pub fn started(&self, title: &str, function: &str) {
        self.emit(Severity::Trace, &LogLine::new(title, function, Tag::Started));
    }

    #[track_caller]
    pub fn started_with(&self, title: &str, function: &str, message: impl Display) {
        self.emit(
            Severity::Trace,
            &LogLine::new(title, function, Tag::Started).with_message(&message),
        );
    }

    #[track_caller]
    pub fn completed(&self, title: &str, function: &str) {
        self.emit(Severity::Trace, &LogLine::new(title, function, Tag::Completed));
    }

    #[track_caller]
    pub fn completed_with(&self, title: &str, function: &str, message: impl Display) {
        self.emit(
            Severity::Trace,
            &LogLine::new(title, function, Tag::Completed).with_message(&message),
        );
    }

    #[track_caller]
    pub fn completed_error(&self, err: impl Display, title: &str, function: &str) {
        self.emit(
            Severity::Error,
            &LogLine::new(title, function, Tag::CompletedError).with_error(&err),
        );
    }

    #[track_caller]
    pub fn completed_error_with(
        &self,
        err: impl Display,
        title: &str,
        function: &str,
        message: impl Display,
    ) {
        self.emit(
            Severity::Error,
            &LogLine::new(title, function, Tag::CompletedError)
                .with_message(&message)
                .with_error(&err),
        );
    }

    /// Write an ALERT line to the error destination and email it.
    ///
    /// Delivery failures are logged, never returned.
    #[track_caller]
    pub fn alert(&self, subject: &str, title: &str, function: &str, message: impl Display) {
        let line = LogLine::new(title, function, Tag::Alert).with_message(&message);
        self.forward(subject, &line);
    }

    #[track_caller]
    pub fn completed_alert(
        &self,
        subject: &str,
        title: &str,
        function: &str,
        message: impl Display,
    ) {
        let line = LogLine::new(title, function, Tag::CompletedAlert).with_message(&message);
        self.forward(subject, &line);
    }

    fn forward(&self, subject: &str, line: &LogLine<'_>) {
        self.emit(Severity::Error, line);
        let _ = self.send_alert(subject, &line.body());
    }

    /// Email `message` under `subject`.
    ///
    /// Without an email configuration this returns `Ok(())` without
    /// touching the transport. A panic inside rendering or delivery comes
    /// back as `LoggerError::AlertPanicked`.
    pub fn send_alert(&self, subject: &str, message: &str) -> Result<()> {
        let forwarder = self.inner.state.lock().forwarder.clone();
        let Some(forwarder) = forwarder else {
            return Ok(());
        };

        match forwarder.send(subject, message) {
            Ok(()) => {
                self.inner.metrics.record_alert_sent();
                Ok(())
            }
            Err(err) => {
                self.inner.metrics.record_alert_failure();
                if matches!(err, super::error::LoggerError::AlertPanicked(_)) {
                    self.inner.metrics.record_panic_contained();
                }
                self.error(&err, SYSTEM_TITLE, "send_alert");
                Err(err)
            }
        }
    }

    /// Replace the email configuration; later alerts use the new one.
    pub fn configure_email(&self, config: EmailConfig) -> Result<()> {
        let transport = self.inner.state.lock().transport.clone();
        let forwarder = build_forwarder(Some(config), transport)?;
        self.inner.state.lock().forwarder = forwarder;
        Ok(())
    }

    /// Reset the logger to `config`.
    ///
    /// Routes, log file, email configuration and level mask are all
    /// replaced; nothing of the previous configuration carries over except
    /// sinks and transports injected through the builder. The previous log
    /// file is closed.
    pub fn restart(&self, config: &LoggerConfig) -> Result<()> {
        config.timestamp_format.validate()?;
        let transport = self.inner.state.lock().transport.clone();
        let forwarder = build_forwarder(config.email.clone(), transport)?;
        let (file, file_path) = match &config.file {
            Some(policy) => open_dated_file(&policy.base_dir)?,
            None => (None, None),
        };

        let previous = {
            let mut state = self.inner.state.lock();
            state.mask = config.level;
            state.routes = Routes::resolve(config.level, file.is_some());
            state.timestamp_format = config.timestamp_format.clone();
            state.forwarder = forwarder;
            state.file_path = file_path;
            std::mem::replace(&mut state.file, file)
        };
        if let Some(mut previous) = previous {
            if let Err(err) = previous.close() {
                self.error(&err, SYSTEM_TITLE, "restart");
            }
        }

        if let Some(policy) = &config.file {
            policy.sweep(self);
        }
        Ok(())
    }

    /// Close the log file, if any, and return the close error.
    ///
    /// Console logging keeps working afterwards.
    pub fn stop(&self) -> Result<()> {
        self.started(SYSTEM_TITLE, "stop");

        let mut result = Ok(());
        let has_file = self.inner.state.lock().file.is_some();
        if has_file {
            self.trace(SYSTEM_TITLE, "stop", "Closing File");
            let mut state = self.inner.state.lock();
            if let Some(mut file) = state.file.take() {
                result = file.close();
            }
            state.file_path = None;
            state.routes = Routes::resolve(state.mask, false);
        }

        self.completed(SYSTEM_TITLE, "stop");
        result
    }

    pub fn flush(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        state.stdout.flush()?;
        state.stderr.flush()?;
        if let Some(file) = state.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Logger")
            .field("mask", &state.mask)
            .field("routes", &state.routes)
            .field("file_path", &state.file_path)
            .field("email", &state.forwarder.is_some())
            .finish()
    }
}

fn build_forwarder(
    email: Option<EmailConfig>,
    transport: Option<Arc<dyn MailTransport>>,
) -> Result<Option<Arc<AlertForwarder>>> {
    let Some(config) = email else {
        return Ok(None);
    };
    let forwarder = match transport {
        Some(transport) => AlertForwarder::new(config, transport)?,
        None => AlertForwarder::smtp(config)?,
    };
    Ok(Some(Arc::new(forwarder)))
}

fn open_dated_file(base_dir: &Path) -> Result<(Option<Box<dyn Sink>>, Option<PathBuf>)> {
    let sink = FileSink::create_dated(base_dir, &Utc::now())?;
    let path = sink.path().to_path_buf();
    Ok((Some(Box::new(sink)), Some(path)))
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use tracelog::prelude::*;
///
/// let captured = MemorySink::new();
/// let logger = Logger::builder()
///     .level(LevelMask::WARN)
///     .stdout_sink(captured.clone())
///     .stderr_sink(captured.clone())
///     .build()
///     .unwrap();
///
/// logger.info("main", "main", "dropped");
/// logger.warning("main", "main", "kept");
/// assert_eq!(captured.lines().len(), 1);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    stdout: Option<Box<dyn Sink>>,
    stderr: Option<Box<dyn Sink>>,
    file_sink: Option<Box<dyn Sink>>,
    transport: Option<Arc<dyn MailTransport>>,
    colors: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            stdout: None,
            stderr: None,
            file_sink: None,
            transport: None,
            colors: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, mask: LevelMask) -> Self {
        self.config.level = mask;
        self
    }

    /// Log into dated directories under `base_dir`, keeping `days_to_keep`
    /// days of them
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, base_dir: impl Into<PathBuf>, days_to_keep: u32) -> Self {
        self.config.file = Some(RetentionPolicy::new(base_dir, days_to_keep));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn email(mut self, email: EmailConfig) -> Self {
        self.config.email = Some(email);
        self
    }

    /// Deliver alerts through `transport` instead of SMTP
    #[must_use = "builder methods return a new value"]
    pub fn mail_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Colour the severity label on console sinks. Default: off
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stdout_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.stdout = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stderr_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.stderr = Some(Box::new(sink));
        self
    }

    /// Mirror console output into `sink` instead of a dated log file
    #[must_use = "builder methods return a new value"]
    pub fn file_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.file_sink = Some(Box::new(sink));
        self
    }

    /// Open the log file, wire the routes and, in file mode, sweep old
    /// log directories.
    pub fn build(mut self) -> Result<Logger> {
        self.config.timestamp_format.validate()?;
        let forwarder = build_forwarder(self.config.email.clone(), self.transport.clone())?;
        let (file, file_path) = match (self.file_sink.take(), &self.config.file) {
            (Some(sink), _) => (Some(sink), None),
            (None, Some(policy)) => open_dated_file(&policy.base_dir)?,
            (None, None) => (None, None),
        };

        let retention = self.config.file.clone();
        let logger = self.assemble(file, file_path, forwarder);
        if let Some(policy) = retention {
            policy.sweep(&logger);
        }
        Ok(logger)
    }

    fn assemble(
        self,
        file: Option<Box<dyn Sink>>,
        file_path: Option<PathBuf>,
        forwarder: Option<Arc<AlertForwarder>>,
    ) -> Logger {
        let state = State {
            mask: self.config.level,
            routes: Routes::resolve(self.config.level, file.is_some()),
            stdout: self
                .stdout
                .unwrap_or_else(|| Box::new(ConsoleSink::stdout()) as Box<dyn Sink>),
            stderr: self
                .stderr
                .unwrap_or_else(|| Box::new(ConsoleSink::stderr()) as Box<dyn Sink>),
            file,
            file_path,
            forwarder,
            transport: self.transport,
            timestamp_format: self.config.timestamp_format,
            colors: self.colors,
        };

        Logger {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                metrics: LoggerMetrics::new(),
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! # TraceLog
//!
//! Leveled, line-oriented logging for console, dated log files and email
//! alerts.
//!
//! ## Features
//!
//! - **Level Mask**: any combination of TRACE, INFO, WARN and ERROR
//! - **File Mirroring**: everything printed can be mirrored into
//!   `<base_dir>/<YYYY-MM-DD>/<start time>.txt`
//! - **Retention**: dated log directories older than a number of days are
//!   removed at startup
//! - **Alerts**: ALERT lines are also sent through a templated email
//! - **Thread Safe**: one lock serializes all writes, so lines never
//!   interleave
//!
//! ## Example
//!
//! ```
//! use tracelog::prelude::*;
//!
//! let logger = Logger::start(LevelMask::TRACE | LevelMask::ERROR);
//!
//! logger.started("main", "main");
//! tracelog::info!(logger, "main", "main", "listening on port {}", 8080);
//! logger.completed("main", "main");
//! ```

pub mod alert;
pub mod core;
pub mod macros;
pub mod retention;
pub mod sinks;

pub mod prelude {
    pub use crate::alert::{EmailConfig, Envelope, MailTransport, SmtpTransport, TlsMode};
    pub use crate::core::{
        Destination, LevelMask, LogLine, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, Routes, Severity, Sink, Stream, Tag, TimestampFormat,
    };
    pub use crate::retention::{RetentionPolicy, SweepReport};
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use alert::{AlertForwarder, EmailConfig, MailTransport, SmtpTransport, TlsMode};
pub use core::{
    Destination, LevelMask, LogLine, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Result, Routes, Severity, Sink, Stream, Tag, TimestampFormat,
};
pub use retention::{RetentionPolicy, SweepReport};
pub use sinks::{ConsoleSink, FileSink, MemorySink};

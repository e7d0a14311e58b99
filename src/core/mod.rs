//! Core logger types and traits

pub mod config;
pub mod error;
pub mod log_level;
pub mod log_line;
pub mod logger;
pub mod metrics;
pub mod router;
pub mod sink;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_level::{LevelMask, Severity};
pub use log_line::{LogLine, Tag};
pub use logger::{Logger, LoggerBuilder, SYSTEM_TITLE};
pub use metrics::LoggerMetrics;
pub use router::{Destination, Routes, Stream};
pub use sink::Sink;
pub use timestamp::TimestampFormat;

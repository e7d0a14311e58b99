//! Logger configuration
//!
//! A [`LoggerConfig`] describes one complete start of the logger. Passing a
//! new one to [`Logger::restart`](crate::Logger::restart) replaces the old
//! configuration entirely.

use super::error::Result;
use super::log_level::LevelMask;
use super::timestamp::TimestampFormat;
use crate::alert::EmailConfig;
use crate::retention::RetentionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// # Example
///
/// ```
/// use tracelog::{LevelMask, LoggerConfig};
///
/// let config = LoggerConfig::from_json_str(r#"{
///     "level": "info|error",
///     "file": { "base_dir": "/var/log/myapp", "days_to_keep": 7 }
/// }"#).unwrap();
///
/// assert_eq!(config.level, LevelMask::INFO | LevelMask::ERROR);
/// assert_eq!(config.file.unwrap().days_to_keep, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LevelMask,
    /// Enables file logging and the retention sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<RetentionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailConfig>,
    pub timestamp_format: TimestampFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelMask::INFO,
            file: None,
            email: None,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new(level: LevelMask) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_file(mut self, base_dir: impl Into<PathBuf>, days_to_keep: u32) -> Self {
        self.file = Some(RetentionPolicy::new(base_dir, days_to_keep));
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: EmailConfig) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            super::error::LoggerError::io_operation(
                "reading logger configuration",
                path.display().to_string(),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }
}

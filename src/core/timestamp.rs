//! Timestamp formatting for the line prefix
//!
//! Every line carries `<LABEL>: <timestamp> <file>:<line>: `. The timestamp
//! is always taken in UTC, the same clock used for dated log directories.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const CLASSIC: &str = "%Y/%m/%d %H:%M:%S";

/// Timestamp format options for the line prefix
///
/// `Custom` strftime strings are checked when deserialized and when a
/// logger is built or restarted.
///
/// # Examples
///
/// ```
/// use tracelog::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2013, 11, 7, 8, 24, 32).unwrap();
/// assert_eq!(TimestampFormat::Classic.format(&at), "2013/11/07 08:24:32");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FormatRepr")]
pub enum TimestampFormat {
    /// Date and time to the second: `2013/11/07 08:24:32`
    #[default]
    Classic,

    /// ISO 8601 with milliseconds: `2013-11-07T08:24:32.123Z`
    Iso8601,

    /// RFC 3339 format: `2013-11-07T08:24:32+00:00`
    Rfc3339,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Classic => datetime.format(CLASSIC).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    // Unchecked format built in code
                    Err(_) => datetime.format(CLASSIC).to_string(),
                }
            }
        }
    }

    /// Reject `Custom` strings chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime format '{}'", format_str),
                ));
            }
        }
        Ok(())
    }
}

/// Wire form of [`TimestampFormat`], validated on the way in
#[derive(Deserialize)]
enum FormatRepr {
    Classic,
    Iso8601,
    Rfc3339,
    Custom(String),
}

impl TryFrom<FormatRepr> for TimestampFormat {
    type Error = LoggerError;

    fn try_from(repr: FormatRepr) -> Result<Self> {
        let format = match repr {
            FormatRepr::Classic => TimestampFormat::Classic,
            FormatRepr::Iso8601 => TimestampFormat::Iso8601,
            FormatRepr::Rfc3339 => TimestampFormat::Rfc3339,
            FormatRepr::Custom(format_str) => TimestampFormat::Custom(format_str),
        };
        format.validate()?;
        Ok(format)
    }
}

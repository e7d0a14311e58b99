//! Dated log directory retention
//!
//! File mode writes into `<base_dir>/<YYYY-MM-DD>/`. At startup every
//! dated directory that is `days_to_keep` or more days older than today
//! (UTC) is removed. Bad names and failed removals are logged and skipped;
//! the sweep never stops early because of one entry.

use crate::core::logger::SYSTEM_TITLE;
use crate::core::Logger;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::ParseIntError;
use std::path::PathBuf;

const FUNCTION: &str = "sweep";

/// Why a directory name is not a `YYYY-MM-DD` date
#[derive(Debug, thiserror::Error)]
pub enum DirectoryNameError {
    #[error("expected three '-' separated parts in '{0}'")]
    Parts(String),

    #[error("invalid number '{part}': {source}")]
    Number {
        part: String,
        #[source]
        source: ParseIntError,
    },

    #[error("'{0}' is not a calendar date")]
    Date(String),
}

/// Parse a directory name strictly as `YYYY-MM-DD`
pub fn parse_directory_date(name: &str) -> Result<NaiveDate, DirectoryNameError> {
    let parts: Vec<&str> = name.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(DirectoryNameError::Parts(name.to_string()));
    };

    let number = |part: &str| {
        part.parse::<u32>().map_err(|source| DirectoryNameError::Number {
            part: part.to_string(),
            source,
        })
    };
    let (year, month, day) = (number(*year)?, number(*month)?, number(*day)?);

    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| DirectoryNameError::Date(name.to_string()))
}

/// Base directory and number of days of logs to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub base_dir: PathBuf,
    pub days_to_keep: u32,
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub retained: Vec<PathBuf>,
    /// Directories whose name is not a date
    pub skipped: Vec<PathBuf>,
    /// Directories that could not be removed
    pub failed: Vec<PathBuf>,
}

impl RetentionPolicy {
    pub fn new(base_dir: impl Into<PathBuf>, days_to_keep: u32) -> Self {
        Self {
            base_dir: base_dir.into(),
            days_to_keep,
        }
    }

    /// Directories dated on or before this day are removed
    pub fn compare_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days_to_keep)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Sweep relative to the current UTC date
    pub fn sweep(&self, logger: &Logger) -> SweepReport {
        self.sweep_at(logger, Utc::now().date_naive())
    }

    /// Sweep relative to `today`, logging progress through `logger`.
    pub fn sweep_at(&self, logger: &Logger, today: NaiveDate) -> SweepReport {
        logger.started_with(
            SYSTEM_TITLE,
            FUNCTION,
            format_args!(
                "BaseDir[{}] DaysToKeep[{}]",
                self.base_dir.display(),
                self.days_to_keep
            ),
        );

        let mut report = SweepReport::default();
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(err) => {
                logger.completed_error(&err, SYSTEM_TITLE, FUNCTION);
                return report;
            }
        };

        let compare_date = self.compare_date(today);
        logger.trace(SYSTEM_TITLE, FUNCTION, format_args!("CompareDate[{}]", compare_date));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    logger.error_with(
                        &err,
                        SYSTEM_TITLE,
                        FUNCTION,
                        "Attempting To Read Directory Entry",
                    );
                    continue;
                }
            };
            if !entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let directory_date = match parse_directory_date(&name) {
                Ok(date) => date,
                Err(err) => {
                    logger.error_with(
                        &err,
                        SYSTEM_TITLE,
                        FUNCTION,
                        format_args!("Attempting To Convert Directory [{}]", name),
                    );
                    report.skipped.push(path);
                    continue;
                }
            };

            let days_old = compare_date.signed_duration_since(directory_date).num_days();
            logger.trace(
                SYSTEM_TITLE,
                FUNCTION,
                format_args!("Checking Directory[{}] DaysOld[{}]", path.display(), days_old),
            );
            if days_old < 0 {
                report.retained.push(path);
                continue;
            }

            logger.trace(
                SYSTEM_TITLE,
                FUNCTION,
                format_args!("Removing Directory[{}]", path.display()),
            );
            match fs::remove_dir_all(&path) {
                Ok(()) => {
                    logger.trace(
                        SYSTEM_TITLE,
                        FUNCTION,
                        format_args!("Directory Removed [{}]", path.display()),
                    );
                    report.removed.push(path);
                }
                Err(err) => {
                    logger.error_with(
                        &err,
                        SYSTEM_TITLE,
                        FUNCTION,
                        format_args!("Attempting To Remove Directory [{}]", path.display()),
                    );
                    report.failed.push(path);
                }
            }
        }

        logger.completed(SYSTEM_TITLE, FUNCTION);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelMask;
    use crate::sinks::MemorySink;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_directory_date() {
        assert_eq!(parse_directory_date("2024-06-05").unwrap(), date(2024, 6, 5));
        assert!(matches!(
            parse_directory_date("notadate"),
            Err(DirectoryNameError::Parts(_))
        ));
        assert!(matches!(
            parse_directory_date("2024-06-05-old"),
            Err(DirectoryNameError::Parts(_))
        ));
        assert!(matches!(
            parse_directory_date("2024-xx-05"),
            Err(DirectoryNameError::Number { .. })
        ));
        assert!(matches!(
            parse_directory_date("2024-02-30"),
            Err(DirectoryNameError::Date(_))
        ));
    }

    #[test]
    fn test_compare_date() {
        let policy = RetentionPolicy::new("/unused", 5);
        assert_eq!(policy.compare_date(date(2024, 6, 10)), date(2024, 6, 5));
        assert_eq!(
            RetentionPolicy::new("/unused", 0).compare_date(date(2024, 6, 10)),
            date(2024, 6, 10)
        );
    }

    #[test]
    fn test_sweep_boundary_and_bad_names() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["2024-06-04", "2024-06-05", "2024-06-06", "2024-06-10", "notadate"] {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("2024-01-01"), "a file, not a directory").unwrap();

        let output = MemorySink::new();
        let logger = Logger::builder()
            .level(LevelMask::TRACE)
            .stdout_sink(output.clone())
            .stderr_sink(output.clone())
            .build()
            .unwrap();

        let mut report =
            RetentionPolicy::new(temp_dir.path(), 5).sweep_at(&logger, date(2024, 6, 10));
        report.removed.sort();
        report.retained.sort();

        assert_eq!(
            report.removed,
            vec![temp_dir.path().join("2024-06-04"), temp_dir.path().join("2024-06-05")]
        );
        assert_eq!(
            report.retained,
            vec![temp_dir.path().join("2024-06-06"), temp_dir.path().join("2024-06-10")]
        );
        assert_eq!(report.skipped, vec![temp_dir.path().join("notadate")]);
        assert!(report.failed.is_empty());

        assert!(!temp_dir.path().join("2024-06-05").exists());
        assert!(temp_dir.path().join("2024-06-06").exists());
        assert!(temp_dir.path().join("2024-01-01").exists());

        let text = output.contents();
        assert!(text.contains("tracelog : sweep : Started : BaseDir["));
        assert!(text.contains("ERROR : Attempting To Convert Directory [notadate]"));
        assert!(text.contains("tracelog : sweep : Completed"));
    }

    #[test]
    fn test_missing_base_dir_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let output = MemorySink::new();
        let logger = Logger::builder()
            .level(LevelMask::ERROR)
            .stderr_sink(output.clone())
            .build()
            .unwrap();

        let report = RetentionPolicy::new(temp_dir.path().join("missing"), 1).sweep(&logger);

        assert_eq!(report, SweepReport::default());
        assert!(output.contents().contains("tracelog : sweep : Completed : ERROR : "));
    }

    #[cfg(unix)]
    #[test]
    fn test_removal_failure_is_logged_and_sweep_continues() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let stuck = temp_dir.path().join("2024-06-01");
        let locked = stuck.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("app.txt"), "old lines").unwrap();
        fs::create_dir(temp_dir.path().join("2024-06-02")).unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
        // Permission bits do not bind a privileged user
        let writable = fs::write(locked.join("check.txt"), "").is_ok();
        if writable {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let output = MemorySink::new();
        let logger = Logger::builder()
            .level(LevelMask::TRACE)
            .stdout_sink(output.clone())
            .stderr_sink(output.clone())
            .build()
            .unwrap();

        let report = RetentionPolicy::new(temp_dir.path(), 1).sweep_at(&logger, date(2024, 6, 10));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.failed, vec![stuck.clone()]);
        assert_eq!(report.removed, vec![temp_dir.path().join("2024-06-02")]);
        assert!(!temp_dir.path().join("2024-06-02").exists());
        assert!(stuck.exists());

        let text = output.contents();
        assert!(text.contains(&format!(
            "tracelog : sweep : ERROR : Attempting To Remove Directory [{}] : ",
            stuck.display()
        )));
        assert!(text.contains("tracelog : sweep : Completed"));
    }
}

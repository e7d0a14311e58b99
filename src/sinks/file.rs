//! File sink implementation
//!
//! File mode keeps one directory per UTC day and one file per process
//! start: `<base>/<YYYY-MM-DD>/<YYYY-MM-DDTHH-MM-SS>.txt`.

use crate::core::{LoggerError, Result, Sink};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the per-day directory for `at`
pub fn date_directory_name(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Name of the per-start log file for `at`
pub fn log_file_name(at: &DateTime<Utc>) -> String {
    format!("{}.txt", at.format("%Y-%m-%dT%H-%M-%S"))
}

pub struct FileSink {
    writer: Option<LineWriter<File>>,
    path: PathBuf,
}

impl FileSink {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), "Failed to create log file", e)
        })?;

        Ok(Self {
            writer: Some(LineWriter::new(file)),
            path,
        })
    }

    /// Create the dated directory under `base_dir` and a log file named
    /// after `now` inside it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tracelog::sinks::FileSink;
    /// use chrono::Utc;
    ///
    /// let sink = FileSink::create_dated("/var/log/myapp", &Utc::now()).unwrap();
    /// println!("logging to {}", sink.path().display());
    /// ```
    pub fn create_dated(base_dir: impl AsRef<Path>, now: &DateTime<Utc>) -> Result<Self> {
        let directory = base_dir.as_ref().join(date_directory_name(now));
        fs::create_dir_all(&directory).map_err(|e| {
            LoggerError::file_appender(
                directory.display().to_string(),
                "Failed to create log directory",
                e,
            )
        })?;

        Self::create(directory.join(log_file_name(now)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Log file already closed"))?;

        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::io_operation("closing log file", self.path.display().to_string(), e)
            })?;
            writer.get_ref().sync_all().map_err(|e| {
                LoggerError::io_operation("syncing log file", self.path.display().to_string(), e)
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

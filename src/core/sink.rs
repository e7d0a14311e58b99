//! Sink trait for log output destinations

use super::error::Result;

/// A destination that accepts whole, newline-terminated lines.
///
/// Implementations must write each line with a single call into the
/// underlying stream so a line is never split across writes.
pub trait Sink: Send + Sync {
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Release the underlying resource, reporting the final error if any.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}

//! In-memory sink for capturing output

use crate::core::{Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects lines in a shared buffer.
///
/// Clones share the same buffer, so one clone can be handed to a logger
/// while another is kept to inspect what was written.
///
/// ```
/// use tracelog::prelude::*;
///
/// let captured = MemorySink::new();
/// let logger = Logger::builder()
///     .level(LevelMask::INFO)
///     .stdout_sink(captured.clone())
///     .build()
///     .unwrap();
///
/// logger.info("main", "main", "Hello Info");
/// assert!(captured.contents().contains("main : main : Info : Hello Info"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer.lock().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.buffer.lock().push_str(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

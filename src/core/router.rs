//! Destination routing
//!
//! Resolves, once per configuration, where each severity writes. The
//! cascade runs from the most verbose bit down, and a log file only ever
//! mirrors a console stream that is already open.

use super::log_level::{LevelMask, Severity};
use serde::{Deserialize, Serialize};

/// Standard console stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Where a single severity's lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Destination {
    /// Lines are dropped
    #[default]
    Discard,
    /// Lines go to a console stream only
    Console(Stream),
    /// Lines go to the log file and a console stream
    Tee(Stream),
}

impl Destination {
    pub fn is_discard(&self) -> bool {
        matches!(self, Destination::Discard)
    }

    pub fn stream(&self) -> Option<Stream> {
        match self {
            Destination::Discard => None,
            Destination::Console(stream) | Destination::Tee(stream) => Some(*stream),
        }
    }

    pub fn includes_file(&self) -> bool {
        matches!(self, Destination::Tee(_))
    }

    fn with_file(self) -> Self {
        match self {
            Destination::Console(stream) => Destination::Tee(stream),
            other => other,
        }
    }
}

/// Resolved destination for each of the four severities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Routes {
    pub trace: Destination,
    pub info: Destination,
    pub warning: Destination,
    pub error: Destination,
}

impl Routes {
    /// Resolve the destinations for `mask`, mirroring into the log file when
    /// `with_file` is set.
    ///
    /// ```
    /// use tracelog::core::{Destination, Routes, Stream};
    /// use tracelog::LevelMask;
    ///
    /// let routes = Routes::resolve(LevelMask::WARN, true);
    /// assert_eq!(routes.trace, Destination::Discard);
    /// assert_eq!(routes.info, Destination::Discard);
    /// assert_eq!(routes.warning, Destination::Tee(Stream::Stdout));
    /// assert_eq!(routes.error, Destination::Tee(Stream::Stderr));
    /// ```
    pub fn resolve(mask: LevelMask, with_file: bool) -> Self {
        let stdout = Destination::Console(Stream::Stdout);
        let stderr = Destination::Console(Stream::Stderr);
        let mut routes = Routes::default();

        if mask.contains(LevelMask::TRACE) {
            routes.trace = stdout;
            routes.info = stdout;
            routes.warning = stdout;
            routes.error = stderr;
        }

        if mask.contains(LevelMask::INFO) {
            routes.info = stdout;
            routes.warning = stdout;
            routes.error = stderr;
        }

        if mask.contains(LevelMask::WARN) {
            routes.warning = stdout;
            routes.error = stderr;
        }

        if mask.contains(LevelMask::ERROR) {
            routes.error = stderr;
        }

        if with_file {
            routes.trace = routes.trace.with_file();
            routes.info = routes.info.with_file();
            routes.warning = routes.warning.with_file();
            routes.error = routes.error.with_file();
        }

        routes
    }

    pub fn get(&self, severity: Severity) -> Destination {
        match severity {
            Severity::Trace => self.trace,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_opens_everything() {
        let routes = Routes::resolve(LevelMask::TRACE, false);
        assert_eq!(routes.trace, Destination::Console(Stream::Stdout));
        assert_eq!(routes.info, Destination::Console(Stream::Stdout));
        assert_eq!(routes.warning, Destination::Console(Stream::Stdout));
        assert_eq!(routes.error, Destination::Console(Stream::Stderr));
    }

    #[test]
    fn test_info_leaves_trace_discarded() {
        let routes = Routes::resolve(LevelMask::INFO, false);
        assert!(routes.trace.is_discard());
        assert_eq!(routes.info.stream(), Some(Stream::Stdout));
        assert_eq!(routes.error.stream(), Some(Stream::Stderr));
    }

    #[test]
    fn test_error_only() {
        let routes = Routes::resolve(LevelMask::ERROR, true);
        assert!(routes.trace.is_discard());
        assert!(routes.info.is_discard());
        assert!(routes.warning.is_discard());
        assert_eq!(routes.error, Destination::Tee(Stream::Stderr));
    }

    #[test]
    fn test_empty_mask_discards_all() {
        let routes = Routes::resolve(LevelMask::NONE, true);
        for severity in Severity::ALL {
            assert!(routes.get(severity).is_discard());
            assert!(!routes.get(severity).includes_file());
        }
    }

    #[test]
    fn test_file_is_never_added_to_discarded_channels() {
        let routes = Routes::resolve(LevelMask::INFO, true);
        assert_eq!(routes.trace, Destination::Discard);
        assert_eq!(routes.info, Destination::Tee(Stream::Stdout));
        assert_eq!(routes.warning, Destination::Tee(Stream::Stdout));
        assert_eq!(routes.error, Destination::Tee(Stream::Stderr));
    }
}

//! Logger metrics
//!
//! Write failures are never reported to the logging caller, so these
//! counters are the only place they show up.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what the logger did with each call
///
/// # Example
///
/// ```
/// use tracelog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines accepted by every sink of their destination
    lines_written: AtomicU64,

    /// Lines whose severity was routed to discard
    lines_discarded: AtomicU64,

    /// Individual sink writes that failed
    write_failures: AtomicU64,

    /// Alerts handed to the mail transport successfully
    alerts_sent: AtomicU64,

    /// Alerts that failed to render or send
    alert_failures: AtomicU64,

    /// Panics caught at the alert boundary
    panics_contained: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            lines_discarded: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            alerts_sent: AtomicU64::new(0),
            alert_failures: AtomicU64::new(0),
            panics_contained: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_discarded(&self) -> u64 {
        self.lines_discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn alerts_sent(&self) -> u64 {
        self.alerts_sent.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn alert_failures(&self) -> u64 {
        self.alert_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn panics_contained(&self) -> u64 {
        self.panics_contained.load(Ordering::Relaxed)
    }

    /// Record a fully written line, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.lines_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.lines_discarded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_alert_sent(&self) -> u64 {
        self.alerts_sent.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_alert_failure(&self) -> u64 {
        self.alert_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panic_contained(&self) -> u64 {
        self.panics_contained.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.lines_discarded.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.alerts_sent.store(0, Ordering::Relaxed);
        self.alert_failures.store(0, Ordering::Relaxed);
        self.panics_contained.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_written: AtomicU64::new(self.lines_written()),
            lines_discarded: AtomicU64::new(self.lines_discarded()),
            write_failures: AtomicU64::new(self.write_failures()),
            alerts_sent: AtomicU64::new(self.alerts_sent()),
            alert_failures: AtomicU64::new(self.alert_failures()),
            panics_contained: AtomicU64::new(self.panics_contained()),
        }
    }
}

//! Logging macros for ergonomic log message formatting.
//!
//! Each macro forwards to the matching [`Logger`](crate::Logger) method with
//! the message built by `format_args!`, so nothing is allocated for a line
//! whose severity is discarded until the line is actually rendered.
//!
//! # Examples
//!
//! ```
//! use tracelog::prelude::*;
//! use tracelog::{completed, info, started};
//!
//! let logger = Logger::start(LevelMask::TRACE);
//!
//! started!(logger, "main", "serve");
//! let port = 8080;
//! info!(logger, "main", "serve", "listening on port {}", port);
//! completed!(logger, "main", "serve", "served {} requests", 0);
//! ```

/// Log a trace-level message.
///
/// ```
/// # use tracelog::prelude::*;
/// # let logger = Logger::start(LevelMask::TRACE);
/// use tracelog::trace;
/// trace!(logger, "main", "calculate", "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.trace($title, $function, format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.info($title, $function, format_args!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// ```
/// # use tracelog::prelude::*;
/// # let logger = Logger::start(LevelMask::WARN);
/// use tracelog::warning;
/// warning!(logger, "main", "retry", "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.warning($title, $function, format_args!($($arg)+))
    };
}

/// Log an error, optionally with a formatted message before it.
///
/// ```
/// # use tracelog::prelude::*;
/// # let logger = Logger::start(LevelMask::ERROR);
/// use tracelog::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// error!(logger, &err, "main", "save");
/// error!(logger, &err, "main", "save", "writing {}", "report.txt");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $err:expr, $title:expr, $function:expr $(,)?) => {
        $logger.error($err, $title, $function)
    };
    ($logger:expr, $err:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.error_with($err, $title, $function, format_args!($($arg)+))
    };
}

/// Log the start of a function, optionally with a formatted message.
#[macro_export]
macro_rules! started {
    ($logger:expr, $title:expr, $function:expr $(,)?) => {
        $logger.started($title, $function)
    };
    ($logger:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.started_with($title, $function, format_args!($($arg)+))
    };
}

/// Log the end of a function, optionally with a formatted message.
#[macro_export]
macro_rules! completed {
    ($logger:expr, $title:expr, $function:expr $(,)?) => {
        $logger.completed($title, $function)
    };
    ($logger:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.completed_with($title, $function, format_args!($($arg)+))
    };
}

/// Log a function ending with an error.
#[macro_export]
macro_rules! completed_error {
    ($logger:expr, $err:expr, $title:expr, $function:expr $(,)?) => {
        $logger.completed_error($err, $title, $function)
    };
    ($logger:expr, $err:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.completed_error_with($err, $title, $function, format_args!($($arg)+))
    };
}

/// Log an ALERT line and email it under `subject`.
///
/// ```
/// # use tracelog::prelude::*;
/// # let logger = Logger::start(LevelMask::ERROR);
/// use tracelog::alert;
/// alert!(logger, "Disk", "main", "check_disk", "{}% used", 97);
/// ```
#[macro_export]
macro_rules! alert {
    ($logger:expr, $subject:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.alert($subject, $title, $function, format_args!($($arg)+))
    };
}

/// Log a function ending with an ALERT and email it under `subject`.
#[macro_export]
macro_rules! completed_alert {
    ($logger:expr, $subject:expr, $title:expr, $function:expr, $($arg:tt)+) => {
        $logger.completed_alert($subject, $title, $function, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LevelMask, Logger};
    use crate::sinks::MemorySink;

    fn capture() -> (Logger, MemorySink) {
        let output = MemorySink::new();
        let logger = Logger::builder()
            .level(LevelMask::TRACE)
            .stdout_sink(output.clone())
            .stderr_sink(output.clone())
            .build()
            .unwrap();
        (logger, output)
    }

    #[test]
    fn test_message_macros() {
        let (logger, output) = capture();

        trace!(logger, "t", "f", "value {}", 1);
        info!(logger, "t", "f", "items {}", 100);
        warning!(logger, "t", "f", "retry {} of {}", 1, 3);

        let lines = output.lines();
        assert!(lines[0].starts_with("TRACE: ") && lines[0].ends_with("t : f : Info : value 1"));
        assert!(lines[1].starts_with("INFO: ") && lines[1].ends_with("t : f : Info : items 100"));
        assert!(lines[2].starts_with("WARNING: "));
        assert!(lines[2].ends_with("t : f : Info : retry 1 of 3"));
    }

    #[test]
    fn test_lifecycle_macros() {
        let (logger, output) = capture();

        started!(logger, "t", "f");
        started!(logger, "t", "f", "id[{}]", 7);
        completed!(logger, "t", "f");
        completed!(logger, "t", "f", "took {}ms", 12);
        completed_error!(logger, "bad", "t", "f");
        completed_error!(logger, "bad", "t", "f", "step {}", 2);

        let lines = output.lines();
        assert!(lines[0].ends_with("t : f : Started"));
        assert!(lines[1].ends_with("t : f : Started : id[7]"));
        assert!(lines[2].ends_with("t : f : Completed"));
        assert!(lines[3].ends_with("t : f : Completed : took 12ms"));
        assert!(lines[4].ends_with("t : f : Completed : ERROR : bad"));
        assert!(lines[5].ends_with("t : f : Completed : ERROR : step 2 : bad"));
    }

    #[test]
    fn test_error_and_alert_macros() {
        let (logger, output) = capture();

        error!(logger, "boom", "t", "f");
        error!(logger, "boom", "t", "f", "while {}", "saving");
        alert!(logger, "Subject", "t", "f", "disk {}%", 99);
        completed_alert!(logger, "Subject", "t", "f", "gave up after {}", 3);

        let lines = output.lines();
        assert!(lines[0].ends_with("t : f : ERROR : boom"));
        assert!(lines[1].ends_with("t : f : ERROR : while saving : boom"));
        assert!(lines[2].starts_with("ERROR: ") && lines[2].ends_with("t : f : ALERT : disk 99%"));
        assert!(lines[3].ends_with("t : f : Completed : ALERT : gave up after 3"));
    }

    #[test]
    fn test_macro_reports_call_site() {
        let (logger, output) = capture();

        let line = line!() + 1;
        info!(logger, "t", "f", "here");

        assert!(output.contents().contains(&format!("macros.rs:{}: ", line)));
    }
}

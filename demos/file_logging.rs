//! File logging example
//!
//! Logs to the console and mirrors every printed line into
//! `./logs/<YYYY-MM-DD>/<start time>.txt`, keeping 7 days of directories.
//!
//! Run with: cargo run --example file_logging

use tracelog::prelude::*;
use tracelog::{completed_error, info, started};

fn main() -> Result<()> {
    println!("=== TraceLog - File Logging Example ===\n");

    let logger = Logger::start_file(LevelMask::TRACE, "logs", 7)?;

    if let Some(path) = logger.log_file() {
        println!("Mirroring output into {}\n", path.display());
    }

    started!(logger, "main", "process");
    for i in 1..=5 {
        info!(logger, "main", "process", "Processing item {}/5", i);
        if i == 3 {
            logger.warning("main", "process", "Item 3 took longer than expected");
        }
    }

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "plugin.so");
    completed_error!(logger, &err, "main", "process", "optional plugin unavailable");

    logger.stop()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

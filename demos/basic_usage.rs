//! Basic logger usage example
//!
//! Demonstrates console logging with different level masks.
//!
//! Run with: cargo run --example basic_usage

use tracelog::prelude::*;
use tracelog::{completed, info, started, warning};

fn main() -> Result<()> {
    println!("=== TraceLog - Basic Usage Example ===\n");

    let logger = Logger::builder().level(LevelMask::TRACE).colors(true).build()?;

    println!("1. Logging at every severity:");
    started!(logger, "main", "main");
    logger.trace("main", "main", "This is a trace message");
    logger.info("main", "main", "This is an info message");
    logger.warning("main", "main", "This is a warning message");
    logger.error("Exception At...", "main", "main");
    logger.error_with("Exception At...", "main", "main", "Hello Error");
    completed!(logger, "main", "main");

    println!("\n2. Restarting with the INFO mask - trace lines are dropped:");
    logger.restart(&LoggerConfig::new(LevelMask::INFO))?;
    logger.trace("main", "main", "Trace message (hidden)");
    info!(logger, "main", "main", "Info message (visible), mask {}", logger.level());
    warning!(logger, "main", "main", "Warning message (visible)");

    println!("\n3. An ALERT without email configured only logs:");
    logger.alert("Disk Space", "main", "main", "97% used");

    logger.stop()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

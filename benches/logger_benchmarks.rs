//! Criterion benchmarks for tracelog

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use tempfile::TempDir;
use tracelog::prelude::*;

/// Accepts every line without keeping it
struct NullSink;

impl Sink for NullSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        black_box(line.len());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn captured(mask: LevelMask) -> Logger {
    Logger::builder()
        .level(mask)
        .stdout_sink(NullSink)
        .stderr_sink(NullSink)
        .build()
        .unwrap()
}

struct NullTransport;

impl MailTransport for NullTransport {
    fn send(&self, envelope: &Envelope<'_>) -> Result<()> {
        black_box(envelope.body.len());
        Ok(())
    }
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("console", |b| {
        b.iter(|| black_box(Logger::start(LevelMask::TRACE)));
    });

    group.bench_function("route_resolution", |b| {
        b.iter(|| black_box(Routes::resolve(black_box(LevelMask::INFO), black_box(true))));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = captured(LevelMask::TRACE);

    group.bench_function("trace", |b| {
        b.iter(|| logger.trace("bench", "trace", black_box("Trace message")));
    });

    group.bench_function("info_formatted", |b| {
        b.iter(|| logger.info("bench", "info", format_args!("item {}", black_box(42))));
    });

    group.bench_function("error_with", |b| {
        b.iter(|| logger.error_with(black_box("boom"), "bench", "error", "Error message"));
    });

    group.bench_function("started_completed", |b| {
        b.iter(|| {
            logger.started("bench", "pair");
            logger.completed("bench", "pair");
        });
    });

    group.finish();
}

fn bench_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::builder()
        .level(LevelMask::INFO)
        .file(temp_dir.path(), 1)
        .stdout_sink(NullSink)
        .stderr_sink(NullSink)
        .build()
        .unwrap();

    group.bench_function("tee_info", |b| {
        b.iter(|| logger.info("bench", "file", black_box("File message")));
    });

    group.finish();
    let _ = logger.stop();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");

    let logger = captured(LevelMask::ERROR);

    group.bench_function("discarded_trace", |b| {
        b.iter(|| logger.trace("bench", "filter", black_box("Filtered message")));
    });

    group.bench_function("discarded_formatted", |b| {
        b.iter(|| logger.info("bench", "filter", format_args!("value {}", black_box(7))));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = captured(LevelMask::INFO);

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = logger.clone();
                    std::thread::spawn(move || {
                        logger.info("bench", "concurrent", black_box("Concurrent message"));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Line Rendering Benchmarks
// ============================================================================

fn bench_line_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_rendering");
    let now = Utc::now();
    let message = "message with\nnewline";
    let error = "Exception At...";

    group.bench_function("render_plain", |b| {
        b.iter(|| {
            let line = LogLine::new("bench", "render", Tag::Error)
                .with_message(&message)
                .with_error(&error);
            black_box(line.render(Severity::Error, &TimestampFormat::Classic, &now, false))
        });
    });

    group.bench_function("render_alert_email", |b| {
        let config = EmailConfig::new("h", 25, "alerts@example.com", "", ["ops@example.com"]);
        let forwarder = tracelog::AlertForwarder::new(config, Arc::new(NullTransport)).unwrap();
        b.iter(|| black_box(forwarder.render("Subject", black_box("disk 97% used")).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_logger_creation,
    bench_logging,
    bench_file_logging,
    bench_level_filtering,
    bench_concurrent_logging,
    bench_line_rendering
);

criterion_main!(benches);

//! Property-based tests for tracelog using proptest

use proptest::prelude::*;
use std::sync::Arc;
use tracelog::prelude::*;

fn any_mask() -> impl Strategy<Value = LevelMask> {
    (0u8..16).prop_map(|bits| LevelMask::from_bits(bits).unwrap())
}

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Trace),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

// ============================================================================
// Level Mask Tests
// ============================================================================

proptest! {
    /// Display output parses back to the same mask
    #[test]
    fn test_mask_display_roundtrip(mask in any_mask()) {
        let parsed: LevelMask = mask.to_string().parse().unwrap();
        prop_assert_eq!(parsed, mask);
    }

    /// Numeric form parses back to the same mask
    #[test]
    fn test_mask_numeric_parse(mask in any_mask()) {
        let parsed: LevelMask = mask.bits().to_string().parse().unwrap();
        prop_assert_eq!(parsed, mask);
    }

    /// Values with bits above ERROR are rejected
    #[test]
    fn test_mask_rejects_unknown_bits(bits in 16u8..=255) {
        prop_assert!(LevelMask::from_bits(bits).is_none());
    }
}

// ============================================================================
// Routing Tests
// ============================================================================

proptest! {
    /// ERROR has a destination whenever any bit is set
    #[test]
    fn test_error_open_for_any_nonempty_mask(mask in any_mask(), with_file in any::<bool>()) {
        let routes = Routes::resolve(mask, with_file);
        prop_assert_eq!(routes.error.is_discard(), mask.is_empty());
    }

    /// Opening a channel opens every less verbose channel
    #[test]
    fn test_cascade_is_monotonic(mask in any_mask(), with_file in any::<bool>()) {
        let routes = Routes::resolve(mask, with_file);
        let open: Vec<bool> = Severity::ALL
            .iter()
            .map(|severity| !routes.get(*severity).is_discard())
            .collect();

        for i in 0..open.len() {
            if open[i] {
                prop_assert!(open[i..].iter().all(|o| *o), "mask {} routes {:?}", mask, routes);
            }
        }
    }

    /// A severity is open exactly when its bit or a more verbose bit is set
    #[test]
    fn test_open_iff_bit_at_or_below(mask in any_mask(), severity in any_severity()) {
        let routes = Routes::resolve(mask, false);
        let expected = Severity::ALL
            .iter()
            .take_while(|s| **s != severity)
            .chain(std::iter::once(&severity))
            .any(|s| mask.contains(s.bit()));
        prop_assert_eq!(!routes.get(severity).is_discard(), expected);
    }

    /// The file mirrors precisely the open channels, and ERROR always uses stderr
    #[test]
    fn test_file_mirrors_open_channels(mask in any_mask(), severity in any_severity()) {
        let console = Routes::resolve(mask, false).get(severity);
        let tee = Routes::resolve(mask, true).get(severity);

        prop_assert_eq!(console.stream(), tee.stream());
        prop_assert_eq!(tee.includes_file(), !console.is_discard());
        prop_assert!(!console.includes_file());

        if let Some(stream) = console.stream() {
            let expected = if severity == Severity::Error {
                Stream::Stderr
            } else {
                Stream::Stdout
            };
            prop_assert_eq!(stream, expected);
        }
    }

    /// A logged line reaches the capture sink iff its severity is routed
    #[test]
    fn test_emit_follows_routes(mask in any_mask(), severity in any_severity()) {
        let out = MemorySink::new();
        let err = MemorySink::new();
        let logger = Logger::builder()
            .level(mask)
            .stdout_sink(out.clone())
            .stderr_sink(err.clone())
            .build()
            .unwrap();

        match severity {
            Severity::Trace => logger.trace("t", "f", "m"),
            Severity::Info => logger.info("t", "f", "m"),
            Severity::Warning => logger.warning("t", "f", "m"),
            Severity::Error => logger.error("m", "t", "f"),
        }

        let written = out.lines().len() + err.lines().len();
        let open = !logger.routes().get(severity).is_discard();
        prop_assert_eq!(written, usize::from(open));
    }
}

// ============================================================================
// Line Formatting Tests (Security Critical!)
// ============================================================================

proptest! {
    /// Messages never break a line, whatever they contain
    #[test]
    fn test_body_is_single_line(message in ".*", error in ".*") {
        let body = LogLine::new("title", "function", Tag::Error)
            .with_message(&message)
            .with_error(&error)
            .body();

        prop_assert!(!body.contains('\n'));
        prop_assert!(!body.contains('\r'));
        prop_assert!(body.starts_with("title : function : ERROR : "));
    }

    /// Attempts to forge a second entry stay on the first line
    #[test]
    fn test_log_injection_prevention(
        legitimate in "[a-zA-Z0-9 ]+",
        forged in prop_oneof![Just("ERROR"), Just("WARNING"), Just("ALERT")],
    ) {
        let captured = MemorySink::new();
        let logger = Logger::builder()
            .level(LevelMask::INFO)
            .stdout_sink(captured.clone())
            .build()
            .unwrap();

        let message = format!("{}\n{}: 2024/01/01 00:00:00 x.rs:1: fake", legitimate, forged);
        logger.info("t", "f", message);

        prop_assert_eq!(captured.lines().len(), 1);
    }
}

// ============================================================================
// Alert Template Tests
// ============================================================================

struct NullTransport;

impl MailTransport for NullTransport {
    fn send(&self, _envelope: &Envelope<'_>) -> Result<()> {
        Ok(())
    }
}

proptest! {
    /// Template fields are substituted verbatim, without HTML escaping
    #[test]
    fn test_template_substitutes_fields(subject in "[^{}]*", message in "[^{}]*") {
        let to = ["a@example.com", "b@example.com"];
        let config = EmailConfig::new("h", 25, "from@example.com", "", to)
            .with_template("{{From}}|{{To}}|{{Subject}}|{{Message}}");
        let forwarder = tracelog::AlertForwarder::new(config, Arc::new(NullTransport)).unwrap();

        let rendered = forwarder.render(&subject, &message).unwrap();
        prop_assert_eq!(
            rendered,
            format!("from@example.com|a@example.com,b@example.com|{}|{}", subject, message)
        );
    }
}

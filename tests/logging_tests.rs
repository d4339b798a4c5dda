// Logging helpers exposed to the binary

#[test]
fn level_parsing_accepts_aliases_and_rejects_garbage() {
    use chargeboard::logging::{min_level, parse_log_level};
    use tracing::Level;

    assert_eq!(parse_log_level(" warning ").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    let err = parse_log_level("loud").unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));

    // Console and file levels combine to the more verbose one
    assert_eq!(min_level(Level::ERROR, Level::DEBUG), Level::DEBUG);
}

#[test]
fn logger_context_carries_cycle() {
    use chargeboard::logging::{LogContext, get_logger_with_context};

    let logger = get_logger_with_context(LogContext::new("refresh").with_cycle(12));
    assert_eq!(logger.context().component, "refresh");
    assert_eq!(logger.context().cycle, Some(12));
    // Emitting without a subscriber is a no-op
    logger.info("cycle finished");
}

//! Integration tests for logging initialisation.

use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::Error;

#[test]
fn init_succeeds_once_then_reports_config_error() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    init_logging(config.clone()).expect("first initialisation");
    tracing::info!(target: "core_runtime", "logging initialised");

    match init_logging(config) {
        Err(Error::Config(message)) => assert!(message.contains("Failed to initialize logging")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn invalid_filter_is_rejected() {
    // Filter parsing fails before any subscriber is installed.
    let config = LoggingConfig::default().with_filter("core_playback=loudest");
    let result = init_logging(config);
    assert!(matches!(result, Err(Error::Config(_))));
}

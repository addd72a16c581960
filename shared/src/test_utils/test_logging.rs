use env_logger::Builder;
use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging with appropriate log level
///
/// This ensures logs are only shown when tests fail or when LOG_LEVEL env var is set.
/// Usage: Call init_test_logging() at the beginning of each test file.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let level_filter = match std::env::var("LOG_LEVEL").as_deref() {
            Ok("warn") => LevelFilter::Warn,
            Ok("info") => LevelFilter::Info,
            Ok("debug") => LevelFilter::Debug,
            Ok("trace") => LevelFilter::Trace,
            // Default to Error level in tests to reduce noise
            _ => LevelFilter::Error,
        };

        let _ = Builder::from_default_env()
            .filter_level(level_filter)
            .is_test(true)
            .try_init();
    });
}

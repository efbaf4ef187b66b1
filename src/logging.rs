//! Logging backend for the `log` facade
//!
//! On macOS records go to the Unified Logging System under the app
//! subsystem. Elsewhere a `tracing-subscriber` formatter writes them to
//! stderr, fed by its `log` bridge.

use log::{Level, LevelFilter};

/// Installs the platform backend. Calling it again keeps the first logger.
pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    if install(level) {
        log::set_max_level(level);
    }
}

/// Maps repeated `-v` flags to a level filter
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Emits `message | {json}` so structured fields survive plain-text sinks
pub fn log_event(level: Level, message: &str, data: &serde_json::Value) {
    log::log!(level, "{} | {}", message, data);
}

#[cfg(target_os = "macos")]
fn install(_level: LevelFilter) -> bool {
    let logger = oslog::OsLogger::new(crate::constants::APP_SUBSYSTEM);
    log::set_boxed_logger(Box::new(logger)).is_ok()
}

#[cfg(not(target_os = "macos"))]
fn install(level: LevelFilter) -> bool {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, prelude::*};

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(subscriber_level(level))
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

#[cfg(not(target_os = "macos"))]
fn subscriber_level(level: LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    use tracing_subscriber::filter::LevelFilter as Filter;

    match level {
        LevelFilter::Off => Filter::OFF,
        LevelFilter::Error => Filter::ERROR,
        LevelFilter::Warn => Filter::WARN,
        LevelFilter::Info => Filter::INFO,
        LevelFilter::Debug => Filter::DEBUG,
        LevelFilter::Trace => Filter::TRACE,
    }
}

#![deny(missing_docs)]
//! Shared logging utilities for the metering workspace.
//!
//! This crate provides the `meter_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! meter_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "metering", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! meter_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "metering", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! meter_info {
    ($($arg:tt)*) => {{
        log::info!(target: "metering", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! meter_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "metering", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! meter_error {
    ($($arg:tt)*) => {{
        log::error!(target: "metering", $($arg)*);
    }};
}

/// Routes log output through the test harness so it only shows for failing
/// tests.
///
/// Calling it again, or after another logger is installed, does nothing.
pub fn initialize_for_tests() {
    use simplelog::{ConfigBuilder, TestLogger};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_level(log::LevelFilter::Off)
        .build();

    // A second init returns an error; the first logger stays in place.
    let _ = TestLogger::init(level, config);
}

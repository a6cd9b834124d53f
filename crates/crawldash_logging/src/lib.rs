#![deny(missing_docs)]
//! Shared logging utilities for the crawldash workspace.
//!
//! This crate provides the `dash_*` logging macros used across the codebase,
//! the logger initialization used by the terminal driver, and a minimal test
//! initializer for the global logger.

use std::cell::Cell;
use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

thread_local! {
    /// Thread-local storage for the current poll tick count.
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Records the scheduler tick the current thread is processing.
/// The driver calls this once per `Tick` message.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Retrieves the poll tick count for the current thread.
/// Returns 0 if no tick has been recorded.
pub fn poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current poll tick.
#[macro_export]
macro_rules! dash_trace {
    ($($arg:tt)*) => {{
        log::trace!("[t{}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current poll tick.
#[macro_export]
macro_rules! dash_debug {
    ($($arg:tt)*) => {{
        log::debug!("[t{}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current poll tick.
#[macro_export]
macro_rules! dash_info {
    ($($arg:tt)*) => {{
        log::info!("[t{}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current poll tick.
#[macro_export]
macro_rules! dash_warn {
    ($($arg:tt)*) => {{
        log::warn!("[t{}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current poll tick.
#[macro_export]
macro_rules! dash_error {
    ($($arg:tt)*) => {{
        log::error!("[t{}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to ./crawldash.log in the current directory.
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initializes the global logger with the given destination and level.
///
/// For `LogDestination::File` or `Both`, creates `./crawldash.log` in the
/// current working directory. If the file cannot be created the file logger
/// is skipped with a warning on stderr.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> =
                vec![terminal_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    // A second initialization keeps the first logger.
    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from("./crawldash.log");
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

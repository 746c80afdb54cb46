//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Where log records are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard output (used with `-v`, so diagnostics interleave with results)
    Stdout,
    /// Standard error
    Stderr,
}

/// Initializes the logger with the specified level, format and output stream.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colored levels) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter will override it for this crate. Noisy
/// dependencies are capped only when `RUST_LOG` is unset, so its per-module
/// directives still apply.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Debug output for the lookup itself
/// geoiplookup -v 8.8.8.8
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=reqwest=debug geoiplookup -v db-update
/// ```
pub fn init_logger_with(
    level: LevelFilter,
    format: LogFormat,
    target: LogTarget,
) -> Result<(), InitializationError> {
    // Read from RUST_LOG environment variable first, then override with CLI arg
    let mut builder = env_logger::Builder::from_default_env();
    let rust_log_set = std::env::var_os("RUST_LOG").is_some_and(|v| !v.is_empty());
    apply_filters(&mut builder, level, rust_log_set);

    builder.target(match target {
        LogTarget::Stdout => env_logger::Target::Stdout,
        LogTarget::Stderr => env_logger::Target::Stderr,
    });

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init() so a second initialization (tests) reports an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Applies the CLI level on top of any `RUST_LOG` directives already parsed into `builder`.
fn apply_filters(builder: &mut env_logger::Builder, level: LevelFilter, rust_log_set: bool) {
    builder.filter_level(level);
    if !rust_log_set {
        builder.filter_module("reqwest", LevelFilter::Info);
        builder.filter_module("hyper", LevelFilter::Info);
        builder.filter_module("hyper_util", LevelFilter::Info);
        builder.filter_module("rustls", LevelFilter::Warn);
    }
    builder.filter_module("geoiplookup", level);
}

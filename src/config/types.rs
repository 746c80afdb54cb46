//! Configuration types.
//!
//! This module defines the immutable [`Config`] value built once at startup and
//! passed by reference into the installer and the resolver.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    COMPILED_LICENSE_KEY, DEFAULT_DATA_DIR, DEFAULT_USER_AGENT, DOWNLOAD_TIMEOUT_SECS,
    MAXMIND_DOWNLOAD_BASE, STAGING_FILE_NAME,
};

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Runtime configuration.
///
/// Constructed once (usually from the command line via
/// [`Cli::into_config`](crate::config::Cli::into_config)) and never mutated
/// afterwards. Tests build it directly with struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use geoiplookup::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/GeoIP"),
///     want_iso: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database directory, or the database file itself
    pub data_dir: PathBuf,

    /// Emit the ISO code
    pub want_iso: bool,

    /// Emit the country name
    pub want_country: bool,

    /// Verbose diagnostics on standard output
    pub verbose: bool,

    /// Log format
    pub log_format: LogFormat,

    /// MaxMind license key used by `db-update`
    pub license_key: Option<String>,

    /// Download endpoint (without query string)
    pub download_base: String,

    /// Where the downloaded archive is staged before extraction
    pub staging_path: PathBuf,

    /// Overall HTTP timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            want_iso: false,
            want_country: false,
            verbose: false,
            log_format: LogFormat::Plain,
            license_key: None,
            download_base: MAXMIND_DOWNLOAD_BASE.to_string(),
            staging_path: std::env::temp_dir().join(STAGING_FILE_NAME),
            timeout_seconds: DOWNLOAD_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Log level implied by the verbose flag.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// Picks the license key from the runtime value, falling back to the compiled-in one.
///
/// Empty strings count as unset on both sides.
pub fn resolve_license_key(runtime: Option<String>) -> Option<String> {
    pick_license_key(runtime, COMPILED_LICENSE_KEY)
}

fn pick_license_key(runtime: Option<String>, compiled: Option<&str>) -> Option<String> {
    runtime
        .filter(|key| !key.is_empty())
        .or_else(|| compiled.filter(|key| !key.is_empty()).map(str::to_string))
}

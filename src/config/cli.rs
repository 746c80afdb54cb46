//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use crate::config::constants::{DEFAULT_DATA_DIR, DOWNLOAD_TIMEOUT_SECS, UPDATE_COMMAND};
use crate::config::types::{resolve_license_key, Config, LogFormat};

const EXAMPLES: &str = "\
Examples:
  geoiplookup 8.8.8.8               Return the country ISO code and name
  geoiplookup -d ~/GeoIP 8.8.8.8    Use a different database directory
  geoiplookup -i 8.8.8.8            Return just the country ISO code
  geoiplookup -c 8.8.8.8            Return just the country name
  geoiplookup db-update             Update the GeoLite2-Country database (do not run more than once a month)";

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "geoiplookup",
    version,
    about = "Find the country that an IP address or hostname originates from, using the GeoLite2-Country database.",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// IP address, hostname, or `db-update`
    #[arg(value_name = "IPADDRESS|HOSTNAME|db-update")]
    pub target: String,

    /// Database directory or file
    #[arg(short = 'd', long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Return country ISO code
    #[arg(short = 'i', long = "iso")]
    pub iso: bool,

    /// Return country name
    #[arg(short = 'c', long = "country")]
    pub country: bool,

    /// Verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Download timeout for `db-update`, in seconds
    #[arg(long, default_value_t = DOWNLOAD_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl Cli {
    /// True when the target asks for a database update instead of a lookup.
    pub fn is_update(&self) -> bool {
        self.target == UPDATE_COMMAND
    }

    /// Builds the immutable runtime configuration.
    ///
    /// `license_key` is the runtime value of `LICENSEKEY`; the compiled-in key
    /// is used when it is absent or empty.
    pub fn into_config(self, license_key: Option<String>) -> Config {
        Config {
            data_dir: self.data_dir,
            want_iso: self.iso,
            want_country: self.country,
            verbose: self.verbose,
            log_format: self.log_format,
            license_key: resolve_license_key(license_key),
            timeout_seconds: self.timeout_seconds,
            ..Default::default()
        }
    }
}

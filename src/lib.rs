//! geoiplookup library: offline IP/hostname to country resolution
//!
//! This library resolves an IP address or hostname to a country using a local
//! MaxMind GeoLite2-Country database, and keeps that database up to date by
//! downloading and unpacking the vendor archive.
//!
//! # Example
//!
//! ```no_run
//! use geoiplookup::{run_lookup, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     want_iso: true,
//!     ..Default::default()
//! };
//!
//! let line = run_lookup(&config, "8.8.8.8").await?;
//! println!("{}", line);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod output;

// Re-export public API
pub use config::{Cli, Config, LogFormat};
pub use run::{run_lookup, run_update};

// Entry points used by the binary
mod run {
    use anyhow::Result;

    use crate::config::Config;
    use crate::geoip::{
        install_database, lookup_country, HttpFetcher, InstallReport, MaxMindCountryDb,
    };
    use crate::initialization::init_client;
    use crate::output::format_record;

    /// Looks up `target` and returns the formatted output line.
    ///
    /// # Errors
    ///
    /// Returns an error if the target does not resolve, the database cannot be
    /// opened, or the query fails.
    pub async fn run_lookup(config: &Config, target: &str) -> Result<String> {
        let record = lookup_country(target, &config.data_dir, MaxMindCountryDb::open).await?;
        Ok(format_record(&record, config.want_iso, config.want_country))
    }

    /// Downloads and installs the GeoLite2-Country database.
    ///
    /// # Errors
    ///
    /// Returns an error if no license key is configured, or if the download,
    /// extraction or cleanup fails.
    pub async fn run_update(config: &Config) -> Result<InstallReport> {
        let client = init_client(config)?;
        let fetcher = HttpFetcher::new(client);
        let report = install_database(config, &fetcher).await?;
        Ok(report)
    }
}

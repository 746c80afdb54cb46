//! GeoIP data structures.
//!
//! This module defines the data structures used for country lookups and database updates.

use std::path::PathBuf;

use crate::config::{ANONYMOUS_PROXY_ISO, ANONYMOUS_PROXY_NAME};

/// Country data as returned by the database engine, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCountry {
    pub iso_code: Option<String>,
    /// English (`en`) country name
    pub country_name: Option<String>,
    pub is_anonymous_proxy: bool,
}

/// Interpreted country for one lookup.
///
/// Anonymous proxies always carry `A1` / `Anonymous Proxy`, whatever country
/// data the database also holds for the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryRecord {
    iso_code: Option<String>,
    country_name: Option<String>,
    is_anonymous_proxy: bool,
}

impl CountryRecord {
    /// Interprets a raw engine result.
    pub fn from_raw(raw: RawCountry) -> Self {
        if raw.is_anonymous_proxy {
            log::debug!("Anonymous IP detected");
            return Self {
                iso_code: Some(ANONYMOUS_PROXY_ISO.to_string()),
                country_name: Some(ANONYMOUS_PROXY_NAME.to_string()),
                is_anonymous_proxy: true,
            };
        }

        Self {
            iso_code: raw.iso_code.filter(|s| !s.is_empty()),
            country_name: raw.country_name.filter(|s| !s.is_empty()),
            is_anonymous_proxy: false,
        }
    }

    pub fn iso_code(&self) -> Option<&str> {
        self.iso_code.as_deref()
    }

    pub fn country_name(&self) -> Option<&str> {
        self.country_name.as_deref()
    }

    pub fn is_anonymous_proxy(&self) -> bool {
        self.is_anonymous_proxy
    }
}

/// Result of scanning an archive for the database entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Number of regular-file entries that matched and were written
    pub matched: usize,
    /// Destination path, if at least one entry was installed
    pub installed: Option<PathBuf>,
}

/// Summary of a `db-update` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Size of the downloaded archive in bytes
    pub downloaded_bytes: u64,
    pub outcome: ExtractOutcome,
}

//! Country queries against a MaxMind database.
//!
//! [`CountryDatabase`] is the only thing the resolver knows about the engine;
//! [`MaxMindCountryDb`] implements it on top of `maxminddb`.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use maxminddb::Reader;
use serde::Deserialize;

use crate::error_handling::ResolutionError;
use crate::geoip::metadata::DatabaseMetadata;
use crate::geoip::types::RawCountry;

/// Country query engine consumed by [`lookup_country`](crate::geoip::lookup_country).
pub trait CountryDatabase {
    /// Returns the country data stored for `address`.
    ///
    /// An address with no entry yields an empty [`RawCountry`], not an error.
    fn country(&self, address: IpAddr) -> Result<RawCountry, ResolutionError>;
}

/// The subset of a GeoIP2/GeoLite2 Country record this tool reads.
#[derive(Debug, Default, Deserialize)]
struct CountryLookup {
    #[serde(default)]
    country: Option<CountryPlace>,
    #[serde(default)]
    traits: Option<CountryTraits>,
}

#[derive(Debug, Default, Deserialize)]
struct CountryPlace {
    #[serde(default)]
    iso_code: Option<String>,
    #[serde(default)]
    names: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct CountryTraits {
    #[serde(default)]
    is_anonymous_proxy: bool,
}

impl From<CountryLookup> for RawCountry {
    fn from(lookup: CountryLookup) -> Self {
        let is_anonymous_proxy = lookup.traits.is_some_and(|t| t.is_anonymous_proxy);
        let (iso_code, country_name) = match lookup.country {
            Some(mut place) => (place.iso_code, place.names.remove("en")),
            None => (None, None),
        };
        RawCountry {
            iso_code,
            country_name,
            is_anonymous_proxy,
        }
    }
}

/// GeoLite2-Country database loaded into memory.
///
/// The file handle is released as soon as the bytes are read; dropping the
/// value frees the data.
pub struct MaxMindCountryDb {
    reader: Reader<Vec<u8>>,
}

impl MaxMindCountryDb {
    /// Loads and parses the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::DatabaseOpen`] if the file cannot be read or
    /// is not a valid MaxMind database.
    pub fn open(path: &Path) -> Result<Self, ResolutionError> {
        let open_error = |reason: String| ResolutionError::DatabaseOpen {
            path: path.to_path_buf(),
            reason,
        };

        let db_bytes = std::fs::read(path).map_err(|e| open_error(e.to_string()))?;
        let reader = Reader::from_source(db_bytes).map_err(|e| open_error(e.to_string()))?;

        let metadata = DatabaseMetadata::from_reader(&reader);
        log::debug!("Opened {} ({})", path.display(), metadata);

        Ok(Self { reader })
    }
}

impl CountryDatabase for MaxMindCountryDb {
    fn country(&self, address: IpAddr) -> Result<RawCountry, ResolutionError> {
        let query_error = |reason: String| ResolutionError::Query {
            address: address.to_string(),
            reason,
        };

        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        let lookup = self
            .reader
            .lookup(address)
            .map_err(|e| query_error(e.to_string()))?;

        if !lookup.has_data() {
            log::debug!("No database entry for {}", address);
            return Ok(RawCountry::default());
        }

        let record: Option<CountryLookup> =
            lookup.decode().map_err(|e| query_error(e.to_string()))?;

        Ok(record.map(RawCountry::from).unwrap_or_default())
    }
}

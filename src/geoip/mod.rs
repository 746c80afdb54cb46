//! GeoIP country lookup and database updates using MaxMind GeoLite2-Country.
//!
//! Two independent paths live here:
//! - **lookup**: resolve a target, open the local database, interpret the country record
//! - **update**: download the vendor archive, extract the `.mmdb`, install it atomically

mod extract;
mod fetch;
mod install;
mod lookup;
mod metadata;
mod resolve;
mod types;

// Re-export public API
pub use extract::{database_name_matcher, extract_database};
pub use fetch::{redact_license_key, Fetcher, HttpFetcher};
pub use install::{build_download_url, install_database};
pub use lookup::{CountryDatabase, MaxMindCountryDb};
pub use metadata::DatabaseMetadata;
pub use resolve::{locate_database, lookup_country, resolve_target};
pub use types::{CountryRecord, ExtractOutcome, InstallReport, RawCountry};

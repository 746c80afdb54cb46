//! Configuration constants.
//!
//! Default paths, vendor endpoints, and network parameters used when building
//! a [`Config`](super::Config).

/// Default database directory (or file) consulted by lookups and updates.
pub const DEFAULT_DATA_DIR: &str = "/usr/share/GeoIP";

/// MaxMind edition installed by `db-update`.
pub const DATABASE_EDITION: &str = "GeoLite2-Country";

/// File name of the installed database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "GeoLite2-Country.mmdb";

/// File name of the downloaded archive inside the temp directory.
pub const STAGING_FILE_NAME: &str = "GeoLite2-Country.tar.gz";

/// MaxMind download base URL
pub const MAXMIND_DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";

/// Environment variable name for the MaxMind license key
pub const LICENSE_KEY_ENV: &str = "LICENSEKEY";

/// License key compiled into the binary, used when `LICENSEKEY` is unset at runtime.
///
/// Set `LICENSEKEY` in the build environment to bake a key in.
pub const COMPILED_LICENSE_KEY: Option<&str> = option_env!("LICENSEKEY");

/// Overall HTTP timeout for the archive download in seconds.
///
/// The GeoLite2-Country archive is a few MB; 5 minutes leaves room for slow links.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// User-Agent sent with the download request.
pub const DEFAULT_USER_AGENT: &str = concat!("geoiplookup/", env!("CARGO_PKG_VERSION"));

/// ISO code reported for addresses flagged as anonymous proxies.
pub const ANONYMOUS_PROXY_ISO: &str = "A1";

/// Country name reported for addresses flagged as anonymous proxies.
pub const ANONYMOUS_PROXY_NAME: &str = "Anonymous Proxy";

/// Target literal that switches the binary into update mode.
pub const UPDATE_COMMAND: &str = "db-update";

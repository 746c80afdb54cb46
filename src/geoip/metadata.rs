//! Metadata of a loaded GeoIP database.

use std::fmt;

use chrono::{DateTime, Utc};
use maxminddb::Reader;

/// Descriptive fields from the database header, used for verbose diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    /// Edition name, e.g. `GeoLite2-Country`
    pub database_type: String,
    /// Build time (seconds since the Unix epoch)
    pub build_epoch: u64,
}

impl DatabaseMetadata {
    /// Extracts metadata from a GeoIP database
    pub fn from_reader<T: AsRef<[u8]>>(reader: &Reader<T>) -> Self {
        Self {
            database_type: reader.metadata.database_type.clone(),
            build_epoch: reader.metadata.build_epoch,
        }
    }

    /// Build time as a UTC timestamp, if the epoch is representable.
    pub fn build_date(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.build_epoch)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for DatabaseMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build_date() {
            Some(date) => write!(
                f,
                "{} built {}",
                self.database_type,
                date.format("%Y-%m-%d")
            ),
            None => write!(f, "{} build_{}", self.database_type, self.build_epoch),
        }
    }
}

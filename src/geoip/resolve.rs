//! Target resolution and country lookup.
//!
//! This module turns a hostname or literal address into one IP address,
//! finds the database file, and interprets the engine's answer.

use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::config::DATABASE_FILE_NAME;
use crate::error_handling::ResolutionError;
use crate::geoip::lookup::CountryDatabase;
use crate::geoip::types::CountryRecord;

/// Resolves a hostname or literal address to a single IP address.
///
/// Uses the system resolver. Literal addresses resolve to themselves without
/// any network traffic. When a name has several addresses, the first one
/// returned is used; the others are ignored.
///
/// # Errors
///
/// Returns [`ResolutionError::Dns`] if resolution fails or yields no addresses.
pub async fn resolve_target(target: &str) -> Result<IpAddr, ResolutionError> {
    let dns_error = |source: io::Error| ResolutionError::Dns {
        target: target.to_string(),
        source,
    };

    let mut addresses = tokio::net::lookup_host((target, 0))
        .await
        .map_err(dns_error)?;

    let address = addresses
        .next()
        .ok_or_else(|| dns_error(io::Error::new(io::ErrorKind::NotFound, "no addresses found")))?
        .ip();

    log::debug!("Ip search for: {}", address);
    Ok(address)
}

/// Finds the database file for a configured data path.
///
/// A directory gets [`DATABASE_FILE_NAME`] appended; a regular file is used as is.
///
/// # Errors
///
/// Returns [`ResolutionError::DatabaseOpen`] if the path does not exist or is
/// neither a directory nor a regular file.
pub fn locate_database(data_path: &Path) -> Result<PathBuf, ResolutionError> {
    let metadata = std::fs::metadata(data_path).map_err(|e| ResolutionError::DatabaseOpen {
        path: data_path.to_path_buf(),
        reason: format!("path does not exist ({})", e),
    })?;

    if metadata.is_dir() {
        Ok(data_path.join(DATABASE_FILE_NAME))
    } else if metadata.is_file() {
        Ok(data_path.to_path_buf())
    } else {
        Err(ResolutionError::DatabaseOpen {
            path: data_path.to_path_buf(),
            reason: "not a directory or regular file".to_string(),
        })
    }
}

/// Looks up the country for `target`.
///
/// Steps, each failing with its own [`ResolutionError`] variant:
/// 1. resolve `target` ([`resolve_target`])
/// 2. locate the database under `data_path` ([`locate_database`])
/// 3. open it with `open` and query the resolved address
///
/// `open` is only called once the target has resolved.
pub async fn lookup_country<D, F>(
    target: &str,
    data_path: &Path,
    open: F,
) -> Result<CountryRecord, ResolutionError>
where
    D: CountryDatabase,
    F: FnOnce(&Path) -> Result<D, ResolutionError>,
{
    let address = resolve_target(target).await?;

    let db_path = locate_database(data_path)?;
    log::debug!("Opening {}", db_path.display());
    let database = open(&db_path)?;

    let raw = database.country(address)?;
    Ok(CountryRecord::from_raw(raw))
}

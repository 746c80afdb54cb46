//! `db-update`: download the GeoLite2-Country archive and install the database.

use url::form_urlencoded;

use crate::config::{Config, DATABASE_EDITION, DATABASE_FILE_NAME, LICENSE_KEY_ENV};
use crate::error_handling::UpdateError;
use crate::geoip::extract::{database_name_matcher, extract_database};
use crate::geoip::fetch::Fetcher;
use crate::geoip::types::InstallReport;

/// Builds the download URL for the configured edition.
///
/// The license key is URL-encoded to handle special characters.
pub fn build_download_url(base: &str, license_key: &str) -> String {
    let encoded_key = form_urlencoded::byte_serialize(license_key.as_bytes()).collect::<String>();
    format!(
        "{}?edition_id={}&license_key={}&suffix=tar.gz",
        base, DATABASE_EDITION, encoded_key
    )
}

/// Downloads the archive and installs `GeoLite2-Country.mmdb` into the data directory.
///
/// Steps, each aborting the rest on failure:
/// 1. require a non-empty license key (checked before any network access)
/// 2. create the data directory if missing
/// 3. download the archive to `config.staging_path`
/// 4. extract the database entry to `<data_dir>/GeoLite2-Country.mmdb`
/// 5. remove the staging archive
///
/// On failure the staging archive is left in place for inspection.
///
/// An archive without a database entry is not an error: nothing is installed,
/// a warning is logged, and the report shows zero matches.
pub async fn install_database<F: Fetcher>(
    config: &Config,
    fetcher: &F,
) -> Result<InstallReport, UpdateError> {
    let license_key = config
        .license_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(UpdateError::MissingLicenseKey(LICENSE_KEY_ENV))?;

    log::debug!("Updating {}", DATABASE_FILE_NAME);

    std::fs::create_dir_all(&config.data_dir).map_err(|source| UpdateError::DataDir {
        path: config.data_dir.clone(),
        source,
    })?;

    let url = build_download_url(&config.download_base, license_key);
    let downloaded_bytes = fetcher.fetch(&url, &config.staging_path).await?;

    let destination = config.data_dir.join(DATABASE_FILE_NAME);
    let outcome = extract_database(
        &config.staging_path,
        &destination,
        database_name_matcher(DATABASE_FILE_NAME),
    )?;

    std::fs::remove_file(&config.staging_path).map_err(|source| UpdateError::Cleanup {
        path: config.staging_path.clone(),
        source,
    })?;

    match &outcome.installed {
        Some(path) => log::info!(
            "Installed {} ({} bytes downloaded, {} matching entr{})",
            path.display(),
            downloaded_bytes,
            outcome.matched,
            if outcome.matched == 1 { "y" } else { "ies" }
        ),
        None => log::warn!(
            "Archive contained no {}; nothing was installed",
            DATABASE_FILE_NAME
        ),
    }

    Ok(InstallReport {
        downloaded_bytes,
        outcome,
    })
}

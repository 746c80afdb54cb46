//! Error type definitions.
//!
//! This module defines the error types for every stage of the lookup and update paths.
//! Messages never repeat their source; `{:#}` prints the chain.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error")]
    HttpClientError(#[from] ReqwestError),
}

/// Failures while resolving a target and querying the country database.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Name resolution failed or returned no addresses.
    #[error("DNS lookup for {target} failed")]
    Dns {
        target: String,
        #[source]
        source: io::Error,
    },

    /// The database path is missing, of the wrong type, or not a valid database.
    #[error("Cannot open GeoIP database {}: {reason}", path.display())]
    DatabaseOpen { path: PathBuf, reason: String },

    /// The database engine rejected the address or failed internally.
    #[error("GeoIP query for {address} failed: {reason}")]
    Query { address: String, reason: String },
}

/// Transfer failures while downloading the database archive.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, timeout, body read).
    ///
    /// Built through `From`, which drops the request URL and with it the license key.
    #[error("Download request failed")]
    Request(#[source] ReqwestError),

    /// The server answered with a non-success status.
    #[error("Download failed with HTTP status {status}")]
    Status { status: reqwest::StatusCode },

    /// The staging file could not be created or written.
    #[error("Cannot write staging file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ReqwestError> for FetchError {
    fn from(error: ReqwestError) -> Self {
        FetchError::Request(error.without_url())
    }
}

/// Failures while unpacking the database archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive file could not be opened.
    #[error("Cannot open archive {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive is not a valid gzip stream.
    #[error("Archive {} is not gzip-compressed", path.display())]
    Decompress { path: PathBuf },

    /// An entry header or path in the archive is malformed.
    #[error("Malformed archive entry")]
    Read {
        #[source]
        source: io::Error,
    },

    /// The matched entry could not be written to its destination.
    #[error("Cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the `db-update` pipeline.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// No license key was configured.
    #[error("GeoIP License Key not set. Export {0} or add it to .env")]
    MissingLicenseKey(&'static str),

    /// The data directory could not be created.
    #[error("Cannot create data directory {}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Downloading the archive failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Unpacking the archive failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The staging archive could not be removed after a successful install.
    #[error("Cannot remove staging file {}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

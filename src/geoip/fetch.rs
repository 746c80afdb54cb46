//! Database archive download.

use std::future::Future;
use std::path::Path;

use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error_handling::FetchError;

/// Downloads a remote resource into a local file.
///
/// Implemented over HTTP by [`HttpFetcher`]; tests substitute their own.
pub trait Fetcher {
    /// Writes the body at `url` to `destination`, creating or truncating it.
    ///
    /// Returns the number of bytes written. No retries.
    fn fetch(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<u64, FetchError>> + Send;
}

/// [`Fetcher`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        log::debug!("Downloading {}", redact_license_key(url));

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "No error details".to_string());
            log::debug!("MaxMind API error response: {}", error_body.trim());
            return Err(FetchError::Status { status });
        }

        let io_error = |source: std::io::Error| FetchError::Io {
            path: destination.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(io_error)?;

        // Stream chunk by chunk; the archive is never held in memory whole
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;

        log::debug!("Downloaded {} bytes to {}", written, destination.display());
        Ok(written)
    }
}

/// Replaces the `license_key` query value so the URL can be logged.
pub fn redact_license_key(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "license_key" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, ScaffoldError};

/// Capability for fetching a remote template archive.
///
/// Every failure is download-tagged so the caller can distinguish it from
/// local I/O problems and offer the builtin-template fallback.
pub trait TemplateFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Fetcher backed by an HTTP client.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let client = reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| ScaffoldError::Download(e.to_string()))?;

            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| ScaffoldError::Download(e.to_string()))?;

            if !response.status().is_success() {
                return Err(ScaffoldError::Download(format!(
                    "{} answered {}",
                    url,
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| ScaffoldError::Download(e.to_string()))?;

            info!("fetched {} ({} bytes)", url, bytes.len());
            Ok(bytes.to_vec())
        })
    }
}

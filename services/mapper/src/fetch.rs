//! HTTP retrieval of discussions and radar products.
//!
//! One attempt per URL. Any transport error or non-success status is a
//! `FetchFailure` and ends the run.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use meso_common::{MesoError, MesoResult};
use reqwest::Client;
use tracing::{debug, instrument};

/// Source of remote documents.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> MesoResult<String>;

    async fn fetch_bytes(&self, url: &str) -> MesoResult<Bytes>;
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> MesoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("meso-mapper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MesoError::Io(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> MesoResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MesoError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MesoError::fetch(url, format!("HTTP {}", status)));
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> MesoResult<String> {
        let text = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| MesoError::fetch(url, e))?;
        debug!(bytes = text.len(), "Fetched text");
        Ok(text)
    }

    #[instrument(skip(self))]
    async fn fetch_bytes(&self, url: &str) -> MesoResult<Bytes> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| MesoError::fetch(url, e))?;
        debug!(bytes = bytes.len(), "Fetched bytes");
        Ok(bytes)
    }
}

//! Document text sources
//!
//! Defines the source trait and the two ways of getting a document's plain
//! text: straight from the upstream export URL, or through a doc-proxy.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::export::export_url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Something that can turn a document URL into plain text
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document behind `url` as plain text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches export URLs from the upstream host directly
#[derive(Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Rewrite `url` to its export form and fetch it
    pub async fn fetch_export(&self, url: &str) -> Result<String, FetchError> {
        let export = export_url(url);
        tracing::debug!("Fetching document export {}", export);

        let response = self.client.get(&export).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DocumentSource for DocumentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_export(url).await
    }
}

/// Goes through a doc-proxy endpoint (`<proxy>?url=<source>`)
#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    proxy_url: String,
}

impl ProxyClient {
    pub fn new(proxy_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            proxy_url: proxy_url.to_string(),
        })
    }

    fn request_url(&self, url: &str) -> String {
        format!("{}?url={}", self.proxy_url, urlencoding::encode(url))
    }
}

#[async_trait]
impl DocumentSource for ProxyClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(self.request_url(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Mock source for testing
#[cfg(test)]
pub struct MockSource {
    pub response: Option<String>,
}

#[cfg(test)]
#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
        self.response
            .clone()
            .ok_or(FetchError::Upstream { status: 404 })
    }
}

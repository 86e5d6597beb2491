//! Application state management

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::fetch::{DocumentFetcher, DocumentSource, FetchError, ProxyClient};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(#[from] FetchError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    fetcher: DocumentFetcher,
    source: Arc<dyn DocumentSource>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Book content is loaded through the configured doc-proxy when one is
    /// set, and straight from the export URL otherwise.
    pub fn new(config: Config, db: SqlitePool) -> Result<Self, StateError> {
        let timeout = Duration::from_secs(config.fetch.timeout_secs);
        let source: Arc<dyn DocumentSource> = match &config.fetch.proxy_url {
            Some(proxy_url) => {
                tracing::info!("Loading documents through proxy {}", proxy_url);
                Arc::new(ProxyClient::new(proxy_url, timeout)?)
            }
            None => Arc::new(DocumentFetcher::new(timeout)?),
        };

        Self::with_source(config, db, source)
    }

    /// Create state with an explicit content source
    pub fn with_source(
        config: Config,
        db: SqlitePool,
        source: Arc<dyn DocumentSource>,
    ) -> Result<Self, StateError> {
        let fetcher = DocumentFetcher::new(Duration::from_secs(config.fetch.timeout_secs))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                fetcher,
                source,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Direct export fetcher backing the doc-proxy route
    pub fn fetcher(&self) -> &DocumentFetcher {
        &self.inner.fetcher
    }

    /// Source used to load book content
    pub fn source(&self) -> &dyn DocumentSource {
        self.inner.source.as_ref()
    }
}

//! Gateway server: the glue between HTTP routes and the catalog.
//!
//! Every catalog-backed operation follows the same sequence: start a
//! stopwatch, build a fresh catalog client from the caller's cookies, make
//! one call under the configured timeout, and wrap the result in an
//! [`Envelope`]. No client state is shared between requests.

use http::HeaderValue;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::error::{GatewayError, Result};
use crate::domains::catalog::{
    AlbumDetails, CatalogClient, CatalogProvider, CatalogResult, HomeSection, SearchResult,
    SongDetails, sort_by_type_priority, ytmusic::YtMusicProvider,
};
use crate::domains::envelope::{Envelope, Stopwatch};

/// Query used by `/search` when the caller gives none.
pub const DEFAULT_SEARCH_QUERY: &str = "Bohemian Rhapsody";

/// Result of one gateway operation.
pub type GatewayResult<T> = std::result::Result<Envelope<T>, GatewayError>;

/// The gateway handler shared by all HTTP routes.
#[derive(Clone)]
pub struct GatewayServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Factory for per-request catalog clients.
    catalog: Arc<dyn CatalogProvider>,
}

impl GatewayServer {
    /// Create a gateway over an explicit catalog provider.
    pub fn new(config: Config, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
        }
    }

    /// Create a gateway backed by YouTube Music.
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = YtMusicProvider::new(&config.catalog)?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    /// Liveness check. Times a no-op.
    pub fn ping(&self) -> Envelope<()> {
        let stopwatch = Stopwatch::start();
        Envelope::timing_only("pong", stopwatch.ping())
    }

    /// Fetch the home feed.
    #[instrument(skip_all)]
    pub async fn home(&self, cookies: Option<HeaderValue>) -> GatewayResult<Vec<HomeSection>> {
        let stopwatch = Stopwatch::start();
        info!("Fetching home sections");

        let sections = self
            .bounded(async {
                let client = self.connect(cookies).await?;
                client.home_sections().await
            })
            .await?;

        Ok(Envelope::new("Fetched home sections", sections, stopwatch.ping()))
    }

    /// Search the catalog and rank the results by type.
    #[instrument(skip(self, cookies))]
    pub async fn search(
        &self,
        cookies: Option<HeaderValue>,
        query: Option<&str>,
    ) -> GatewayResult<Vec<SearchResult>> {
        let stopwatch = Stopwatch::start();
        let query = query
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_SEARCH_QUERY);
        info!("Searching for {:?}", query);

        let mut results = self
            .bounded(async {
                let client = self.connect(cookies).await?;
                client.search(query).await
            })
            .await?;
        sort_by_type_priority(&mut results);
        debug!("Search returned {} results", results.len());

        Ok(Envelope::new(
            format!("Searched for {query}"),
            results,
            stopwatch.ping(),
        ))
    }

    /// Fetch one album.
    #[instrument(skip(self, cookies))]
    pub async fn album(
        &self,
        cookies: Option<HeaderValue>,
        id: &str,
    ) -> GatewayResult<AlbumDetails> {
        let stopwatch = Stopwatch::start();
        if id.is_empty() {
            return Err(GatewayError::MissingId("album"));
        }
        info!("Fetching album {}", id);

        let album = self
            .bounded(async {
                let client = self.connect(cookies).await?;
                client.album(id).await
            })
            .await?;

        Ok(Envelope::new(
            format!("Fetched album {}", album.name),
            album,
            stopwatch.ping(),
        ))
    }

    /// Fetch one song.
    #[instrument(skip(self, cookies))]
    pub async fn song(
        &self,
        cookies: Option<HeaderValue>,
        id: &str,
    ) -> GatewayResult<SongDetails> {
        let stopwatch = Stopwatch::start();
        if id.is_empty() {
            return Err(GatewayError::MissingId("song"));
        }
        info!("Fetching song {}", id);

        let song = self
            .bounded(async {
                let client = self.connect(cookies).await?;
                client.song(id).await
            })
            .await?;

        Ok(Envelope::new(
            format!("Fetched song {}", song.name),
            song,
            stopwatch.ping(),
        ))
    }

    /// Build a client for one request.
    async fn connect(&self, cookies: Option<HeaderValue>) -> CatalogResult<Box<dyn CatalogClient>> {
        let options = self.config.catalog.client_options(cookies);
        self.catalog.connect(options).await
    }

    /// Run a catalog operation under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = CatalogResult<T>>,
    ) -> std::result::Result<T, GatewayError> {
        let limit = self.config.catalog.request_timeout();
        match tokio::time::timeout(limit, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("Catalog call failed: {}", e);
                Err(GatewayError::Catalog(e))
            }
            Err(_) => {
                warn!("Catalog call timed out after {:?}", limit);
                Err(GatewayError::Timeout(limit))
            }
        }
    }
}

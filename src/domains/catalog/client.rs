//! Catalog client abstraction.
//!
//! The gateway never holds a long-lived, mutable catalog client. Instead a
//! [`CatalogProvider`] hands out a fresh [`CatalogClient`] for every request,
//! initialized with that request's cookies. Tests substitute a mock provider.

use async_trait::async_trait;
use http::HeaderValue;
use tracing::level_filters::LevelFilter;

use super::error::CatalogResult;
use super::model::{AlbumDetails, HomeSection, SearchResult, SongDetails};

/// Options used to initialize a catalog client.
#[derive(Clone)]
pub struct ClientOptions {
    /// Raw `Cookie` header forwarded from the caller, bytes untouched.
    pub cookies: Option<HeaderValue>,

    /// Country override (`gl`).
    pub gl: Option<String>,

    /// Language override (`hl`).
    pub hl: Option<String>,

    /// Level at which the client's own diagnostics are emitted.
    /// Applies to this client instance only.
    pub log_level: LevelFilter,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cookies: None,
            gl: None,
            hl: None,
            log_level: LevelFilter::OFF,
        }
    }
}

/// Custom Debug implementation to keep session cookies out of logs.
impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("cookies", &self.cookies.as_ref().map(|_| "[REDACTED]"))
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ClientOptions {
    /// Options carrying the given cookie header.
    pub fn with_cookies(mut self, cookies: Option<HeaderValue>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// An initialized catalog session.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the sections of the home feed.
    async fn home_sections(&self) -> CatalogResult<Vec<HomeSection>>;

    /// Search the catalog for songs, albums, playlists, videos and artists.
    async fn search(&self, query: &str) -> CatalogResult<Vec<SearchResult>>;

    /// Fetch an album with its track list.
    async fn album(&self, album_id: &str) -> CatalogResult<AlbumDetails>;

    /// Fetch a song by video id.
    async fn song(&self, video_id: &str) -> CatalogResult<SongDetails>;
}

/// Factory for catalog clients.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Build and initialize a client for one request.
    async fn connect(&self, options: ClientOptions) -> CatalogResult<Box<dyn CatalogClient>>;
}

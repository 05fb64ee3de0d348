//! Catalog domain module.
//!
//! Everything the gateway knows about the music catalog lives here: the
//! client abstraction, the values it returns, how search results are ranked,
//! and the YouTube Music implementation.
//!
//! ## Architecture
//!
//! - `client.rs` - `CatalogProvider` / `CatalogClient` traits
//! - `model.rs` - search results, album, song and home values
//! - `ranking.rs` - type-priority ordering of search results
//! - `ytmusic/` - InnerTube-backed implementation
//! - `error.rs` - catalog-specific error types

mod client;
mod error;
mod model;
mod ranking;
pub mod ytmusic;

pub use client::{CatalogClient, CatalogProvider, ClientOptions};
pub use error::{CatalogError, CatalogResult};
pub use model::{AlbumDetails, HomeSection, ResultType, SearchResult, SongDetails};
pub use ranking::sort_by_type_priority;

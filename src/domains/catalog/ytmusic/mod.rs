//! YouTube Music implementation of the catalog client.
//!
//! - `client.rs` - provider and session over the InnerTube web API
//! - `ytcfg.rs` - config scraped from the landing page
//! - `parser.rs` - payload to catalog value conversion
//! - `traverse.rs` - deep key lookups in payloads

mod client;
pub mod parser;
pub mod traverse;
mod ytcfg;

pub use client::{YtMusicClient, YtMusicProvider};
pub use ytcfg::InnertubeConfig;

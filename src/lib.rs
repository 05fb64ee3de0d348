//! Music Catalog Gateway Library
//!
//! A thin HTTP gateway in front of the YouTube Music catalog. Every route
//! builds a catalog client from the caller's cookies, makes one call, and
//! returns the result in a uniform `{ message, results, ping }` envelope.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the gateway server and the
//!   HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **catalog**: catalog client abstraction, values, ranking and the
//!     YouTube Music implementation
//!   - **envelope**: response bodies and request timing
//!
//! # Example
//!
//! ```rust,no_run
//! use music_catalog_gateway::core::{Config, GatewayServer, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = HttpTransport::new(config.transport.clone());
//!     let server = GatewayServer::from_config(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, GatewayServer, Result};

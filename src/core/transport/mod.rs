//! Transport layer for the gateway.
//!
//! The gateway is served over HTTP only: an axum router with a CORS layer,
//! request tracing, and opt-in pretty-printed JSON. Handlers delegate to the
//! [`GatewayServer`](crate::core::GatewayServer).

mod config;
mod error;
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;

//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the gateway:
//! configuration, error handling, the gateway server, and the HTTP
//! transport.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, GatewayError, Result};
pub use server::GatewayServer;
pub use transport::{HttpConfig, HttpTransport};

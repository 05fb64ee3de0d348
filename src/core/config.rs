//! Configuration management for the gateway.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) on top of defaults.

use super::transport::HttpConfig;
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::warn;

use crate::domains::catalog::ClientOptions;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub transport: HttpConfig,

    /// Upstream catalog configuration.
    pub catalog: CatalogConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server, used in logs.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the upstream music catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Origin of the catalog web app.
    pub base_url: String,

    /// Country override sent to the catalog.
    pub gl: Option<String>,

    /// Language override sent to the catalog.
    pub hl: Option<String>,

    /// Upper bound on one catalog operation, in seconds.
    pub request_timeout_secs: u64,

    /// Level for the catalog client's own diagnostics ("off" silences them).
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://music.youtube.com/".to_string(),
            gl: None,
            hl: None,
            request_timeout_secs: 15,
            log_level: "off".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Bounded wait applied to every catalog operation.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed diagnostics level. Unknown values fall back to `off`.
    pub fn client_log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::OFF)
    }

    /// Client options for one request carrying `cookies`.
    pub fn client_options(&self, cookies: Option<HeaderValue>) -> ClientOptions {
        ClientOptions {
            cookies,
            gl: self.gl.clone(),
            hl: self.hl.clone(),
            log_level: self.client_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "music-catalog-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `PORT` and `HOST` select the listener; gateway settings use the
    /// `GATEWAY_` prefix and upstream settings the `CATALOG_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("GATEWAY_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("GATEWAY_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(base_url) = std::env::var("CATALOG_BASE_URL") {
            config.catalog.base_url = base_url;
        }

        config.catalog.gl = non_empty_var("CATALOG_GL");
        config.catalog.hl = non_empty_var("CATALOG_HL");

        if let Ok(timeout) = std::env::var("CATALOG_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.catalog.request_timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid CATALOG_TIMEOUT_SECS={:?}, using {}s",
                    timeout, config.catalog.request_timeout_secs
                ),
            }
        }

        if let Ok(level) = std::env::var("CATALOG_LOG_LEVEL") {
            config.catalog.log_level = level;
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

//! Error types and handling for the gateway.
//!
//! [`Error`] is the crate-level error used at startup. [`GatewayError`] is
//! what a single request can fail with; the HTTP layer maps it to a status
//! code and a `{ message }` body.

use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use super::transport::TransportError;
use crate::domains::catalog::CatalogError;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the HTTP listener.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error originating from the catalog domain.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Errors a single gateway request can end with.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The route requires an id and none was given.
    #[error("No {0} ID provided")]
    MissingId(&'static str),

    /// The request could not be decoded, e.g. a path segment that is not UTF-8.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog call did not finish within the configured bound.
    #[error("Catalog did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl GatewayError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingId(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::InvalidId { .. }) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_message() {
        assert_eq!(
            GatewayError::MissingId("album").to_string(),
            "No album ID provided"
        );
        assert_eq!(
            GatewayError::MissingId("song").to_string(),
            "No song ID provided"
        );
        assert_eq!(
            GatewayError::MissingId("song").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_catalog_error_statuses() {
        let invalid = GatewayError::from(CatalogError::invalid_id("song", "x"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let missing = GatewayError::from(CatalogError::not_found("Album MPRE"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let upstream = GatewayError::from(CatalogError::Status { status: 500 });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.to_string(), "Catalog responded with HTTP 500");
    }

    #[test]
    fn test_invalid_request() {
        let err = GatewayError::InvalidRequest("bad path".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request: bad path");
    }

    #[test]
    fn test_timeout() {
        let err = GatewayError::Timeout(Duration::from_secs(15));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.to_string(), "Catalog did not respond within 15s");
    }
}

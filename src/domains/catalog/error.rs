//! Catalog-specific error types.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success HTTP status.
    #[error("Catalog responded with HTTP {status}")]
    Status { status: u16 },

    /// The catalog answered but the payload could not be understood.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The identifier does not have the shape the catalog expects.
    #[error("Invalid {kind} ID: {id}")]
    InvalidId { kind: &'static str, id: String },

    /// The catalog has no entity for the identifier.
    #[error("{0} not found")]
    NotFound(String),

    /// The client was built with unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid-id error.
    pub fn invalid_id(kind: &'static str, id: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            id: id.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

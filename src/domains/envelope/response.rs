//! Response bodies shared by every route.

use serde::{Deserialize, Serialize};

use super::ping::Ping;

/// The uniform `{ message, results, ping }` response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,

    pub ping: Ping,
}

impl<T> Envelope<T> {
    /// Envelope around a catalog result.
    pub fn new(message: impl Into<String>, results: T, ping: Ping) -> Self {
        Self {
            message: message.into(),
            results: Some(results),
            ping,
        }
    }

    /// Envelope carrying only a message and timing.
    pub fn timing_only(message: impl Into<String>, ping: Ping) -> Self {
        Self {
            message: message.into(),
            results: None,
            ping,
        }
    }
}

/// A body made of a single `message` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! Request timing.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Unit reported in every ping.
pub const PING_UNIT: &str = "ms";

/// Elapsed time attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    /// Elapsed milliseconds.
    pub time: u64,

    /// Always `"ms"`.
    #[serde(rename = "type")]
    pub unit: String,

    /// `time` rendered with its unit, e.g. `"12ms"`.
    pub absolute: String,
}

impl Ping {
    pub fn from_millis(time: u64) -> Self {
        Self {
            time,
            unit: PING_UNIT.to_string(),
            absolute: format!("{time}{PING_UNIT}"),
        }
    }
}

/// Measures the time spent handling one request.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since [`Stopwatch::start`], as a ping.
    pub fn ping(&self) -> Ping {
        let millis = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ping::from_millis(millis)
    }
}

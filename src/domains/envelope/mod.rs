//! Envelope domain module.
//!
//! Response bodies and request timing. Every successful catalog response is
//! wrapped as `{ message, results, ping }`; errors and static routes use a
//! bare `{ message }`.

mod ping;
mod response;

pub use ping::{PING_UNIT, Ping, Stopwatch};
pub use response::{Envelope, Message};

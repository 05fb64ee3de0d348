//! Domains module containing business logic organized by bounded contexts.
//!
//! - **catalog**: the music catalog client, its values and result ranking
//! - **envelope**: response bodies and request timing

pub mod catalog;
pub mod envelope;

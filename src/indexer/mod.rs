//! Remote indexer integration.
//!
//! # Data Flow
//! ```text
//! IndexerConfig (base URL, failovers, API key, timeout)
//!     → client.rs (HTTP with timeouts and failover)
//!     → types.rs (response shapes, errors)
//! ```
//!
//! Idempotent GETs fail over across endpoints; the relay POST does not.

pub mod client;
pub mod types;

pub use client::IndexerClient;
pub use types::{IndexerError, IndexerResult, JettonBalance};

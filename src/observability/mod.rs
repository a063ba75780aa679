//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! indexer, wallet transfer, session sync produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters through the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Metrics are recorded through the facade; installing a recorder is up to
//!   the embedding application

pub mod logging;
pub mod metrics;

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section has defaults so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wallet::payload::TransferStyle;

/// Root configuration for the wallet link.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LinkConfig {
    /// Remote indexer settings (balances, jetton wallet lookup).
    pub indexer: IndexerConfig,

    /// Transaction building settings.
    pub transfer: TransferConfig,

    /// Extra or overriding token symbols, mapped to jetton master addresses.
    pub tokens: BTreeMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Indexer HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Base URL of the indexer (tonapi-compatible).
    pub base_url: String,

    /// Failover base URLs, tried in order after the primary.
    pub failover_urls: Vec<String>,

    /// Optional bearer token sent with every request.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tonapi.io".to_string(),
            failover_urls: Vec::new(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Transfer construction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// How long a prepared transaction stays valid, in seconds.
    pub valid_for_secs: u64,

    /// How jetton transfers are built.
    pub jetton_style: TransferStyle,

    /// TON attached to the jetton wallet message to pay for forwarding (nanotons).
    pub jetton_attached_nanotons: u64,

    /// TON forwarded to the recipient with the transfer notification (nanotons).
    pub forward_nanotons: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            valid_for_secs: 600,
            jetton_style: TransferStyle::JettonCell,
            jetton_attached_nanotons: 50_000_000, // 0.05 TON
            forward_nanotons: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

//! Indexer response types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the indexer.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// A configured base URL could not be used.
    #[error("invalid indexer endpoint '{url}': {reason}")]
    Endpoint { url: String, reason: String },

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The indexer answered with a non-success status.
    #[error("indexer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not finish within the configured timeout.
    #[error("indexer request timed out after {0} seconds")]
    Timeout(u64),

    /// The response body did not have the expected shape.
    #[error("unexpected indexer response: {0}")]
    Decode(String),
}

impl IndexerError {
    /// Whether another endpoint might answer differently.
    ///
    /// Client errors (4xx) and decode failures are definitive.
    pub fn is_retryable(&self) -> bool {
        match self {
            IndexerError::Http(_) | IndexerError::Timeout(_) => true,
            IndexerError::Status { status, .. } => *status >= 500,
            IndexerError::Endpoint { .. } | IndexerError::Decode(_) => false,
        }
    }
}

/// Result type for indexer operations.
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Account reference as returned inside indexer payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_scam: bool,
    #[serde(default)]
    pub is_wallet: bool,
}

/// Jetton metadata attached to a balance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JettonPreview {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    9
}

/// Response of `GET /v2/accounts/{account}/jettons/{jetton}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JettonBalance {
    /// Balance in the jetton's base units, as a decimal string.
    pub balance: String,
    #[serde(default)]
    pub wallet_address: Option<AccountRef>,
    #[serde(default)]
    pub jetton: Option<JettonPreview>,
}

/// Subset of `GET /v2/accounts/{account}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    /// Native balance in nanotons.
    pub balance: u128,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of a get-method execution.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodExecution {
    pub success: bool,
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default)]
    pub decoded: Option<serde_json::Value>,
}

impl MethodExecution {
    /// Extract `decoded.jetton_wallet_address` from a `get_wallet_address` run.
    pub fn jetton_wallet_address(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.decoded
            .as_ref()?
            .get("jetton_wallet_address")?
            .as_str()
    }
}

/// Body of the relay endpoint `POST /address/{to}/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTransferRequest {
    pub token: String,
    pub amount: String,
}

//! Wallet error definitions.

use thiserror::Error;
use tonlib_core::cell::TonCellError;

use crate::indexer::IndexerError;

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No address is mirrored from the wallet-connect provider.
    #[error("Wallet is not connected")]
    NotConnected,

    /// An address could not be parsed.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// An amount was not a non-negative integer in base units.
    #[error("Invalid amount '{0}': expected a non-negative integer in base units")]
    InvalidAmount(String),

    /// A forward comment does not fit into a single cell.
    #[error("Comment is {len} bytes, at most {max} fit in a transfer")]
    CommentTooLong { len: usize, max: usize },

    /// Indexer lookup or relay failed.
    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),

    /// Cell or BOC encoding failed.
    #[error("Payload encoding failed: {0}")]
    Encoding(#[from] TonCellError),

    /// The channel to the wallet broke before it answered.
    #[error("Wallet bridge error: {0}")]
    Bridge(String),

    /// The wallet declined the request.
    #[error("Transaction rejected by wallet: {0}")]
    Rejected(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

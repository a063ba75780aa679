//! TON wallet link: connect a wallet through a wallet-connect provider, read
//! balances from a tonapi-compatible indexer, and submit TON or jetton
//! transfers.

pub mod config;
pub mod indexer;
pub mod observability;
pub mod wallet;

pub use config::LinkConfig;
pub use indexer::IndexerClient;
pub use wallet::{WalletConnector, WalletLink};

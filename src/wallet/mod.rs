//! Wallet integration subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConnector (provider status, disconnect, send_transaction)
//!     → session.rs (mirror address into WalletStore, modal state)
//!     → transfer.rs (native or jetton transfer, via indexer + payload.rs)
//!     → link.rs (WalletLink: the handle applications hold)
//! ```
//!
//! # Constraints
//! - The store only ever holds what the provider last reported
//! - Amounts are base-unit integer strings; nothing is converted from decimals
//! - Failures are logged where they happen and returned to the caller

pub mod address;
pub mod connector;
pub mod link;
pub mod payload;
pub mod session;
pub mod tokens;
pub mod transfer;
pub mod types;

pub use connector::{
    ChannelConnector, ConnectionStatus, Network, SendTransactionRequest, SendTransactionResponse,
    TransactionMessage, WalletConnector, WalletRequest,
};
pub use link::WalletLink;
pub use payload::TransferStyle;
pub use session::{ModalState, StoreState, WalletStore};
pub use tokens::{CoinSymbol, TokenRegistry};
pub use transfer::{PreparedTransfer, TransferOutcome, TransferRequest};
pub use types::{WalletError, WalletResult};

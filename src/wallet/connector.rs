//! Wallet-connect provider seam.
//!
//! The wallet application lives on the other side of a wallet-connect
//! session. This crate only sees connection status, a disconnect call and
//! `send_transaction`; how the session is carried is up to the implementor.
//!
//! Request and response types follow the TonConnect JSON shapes so they can
//! be handed to a bridge unchanged.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::wallet::address;
use crate::wallet::types::{WalletError, WalletResult};

/// TON network a wallet is connected to, encoded as its global id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Network {
    #[default]
    #[serde(rename = "-239")]
    Mainnet,
    #[serde(rename = "-3")]
    Testnet,
}

/// Connection state as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected {
        /// Raw `wc:hex` address of the connected wallet.
        address: String,
        network: Network,
    },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }

    pub fn network(&self) -> Option<Network> {
        match self {
            ConnectionStatus::Connected { network, .. } => Some(*network),
            ConnectionStatus::Disconnected => None,
        }
    }

    /// User-friendly form of the connected address.
    pub fn display_address(&self) -> Option<WalletResult<String>> {
        match self {
            ConnectionStatus::Connected { address, network } => {
                Some(address::display_address(address, *network))
            }
            ConnectionStatus::Disconnected => None,
        }
    }
}

/// A transaction the wallet is asked to sign and send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionRequest {
    /// Unix timestamp after which the wallet must refuse the request.
    pub valid_until: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub messages: Vec<TransactionMessage>,
}

/// One outgoing internal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMessage {
    /// Destination address.
    pub address: String,
    /// Nanotons attached, as a decimal string.
    pub amount: String,
    /// Base64 BOC of the message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_init: Option<String>,
}

/// Wallet answer to a successful `send_transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionResponse {
    /// Base64 BOC of the signed external message.
    pub boc: String,
}

/// The wallet-connect provider.
pub trait WalletConnector: Send + Sync {
    /// Subscribe to connection status. The current value is available immediately.
    fn status(&self) -> watch::Receiver<ConnectionStatus>;

    /// End the wallet session.
    fn disconnect(&self) -> impl Future<Output = WalletResult<()>> + Send;

    /// Ask the wallet to sign and broadcast `request`.
    fn send_transaction(
        &self,
        request: SendTransactionRequest,
    ) -> impl Future<Output = WalletResult<SendTransactionResponse>> + Send;
}

/// A pending wallet-side request, answered exactly once.
#[derive(Debug)]
pub struct WalletRequest {
    request: SendTransactionRequest,
    respond_to: oneshot::Sender<WalletResult<SendTransactionResponse>>,
}

impl WalletRequest {
    pub fn request(&self) -> &SendTransactionRequest {
        &self.request
    }

    /// Answer with the signed BOC.
    pub fn approve(self, boc: impl Into<String>) {
        let _ = self
            .respond_to
            .send(Ok(SendTransactionResponse { boc: boc.into() }));
    }

    /// Decline the request.
    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.respond_to.send(Err(WalletError::Rejected(reason.into())));
    }
}

/// In-process provider: requests are delivered to a receiver held by whoever
/// plays the wallet (a CLI prompt, a bridge task, a test).
#[derive(Debug)]
pub struct ChannelConnector {
    status_tx: watch::Sender<ConnectionStatus>,
    requests: mpsc::Sender<WalletRequest>,
}

impl ChannelConnector {
    /// Create a connector and the wallet-side request receiver.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<WalletRequest>) {
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        let (requests, rx) = mpsc::channel(buffer.max(1));
        (Self { status_tx, requests }, rx)
    }

    /// Report a wallet as connected.
    pub fn connect(&self, address: impl Into<String>, network: Network) {
        let address = address.into();
        tracing::info!(address = %address, ?network, "Wallet connected");
        self.status_tx.send_replace(ConnectionStatus::Connected { address, network });
    }
}

impl WalletConnector for ChannelConnector {
    fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.status_tx.send_replace(ConnectionStatus::Disconnected);
        tracing::info!("Wallet disconnected");
        Ok(())
    }

    async fn send_transaction(
        &self,
        request: SendTransactionRequest,
    ) -> WalletResult<SendTransactionResponse> {
        if !self.status_tx.borrow().is_connected() {
            return Err(WalletError::NotConnected);
        }

        let (respond_to, response) = oneshot::channel();
        self.requests
            .send(WalletRequest { request, respond_to })
            .await
            .map_err(|_| WalletError::Bridge("wallet side closed".to_string()))?;

        response
            .await
            .map_err(|_| WalletError::Bridge("wallet dropped the request".to_string()))?
    }
}

//! The application-facing wallet handle.
//!
//! Wires the provider, the mirrored store, the indexer and the transfer
//! service together and exposes the operations a UI needs: modal control,
//! the connected address, disconnect, balance lookups and transfers.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::LinkConfig;
use crate::indexer::IndexerClient;
use crate::wallet::connector::{Network, WalletConnector};
use crate::wallet::session::{CloseReason, ModalController, ModalState, SessionSync, WalletStore};
use crate::wallet::tokens::TokenRegistry;
use crate::wallet::transfer::{
    PreparedTransfer, TransferOrigin, TransferOutcome, TransferRequest, TransferService,
};
use crate::wallet::types::{WalletError, WalletResult};

/// Balance reported when a lookup fails.
pub const FALLBACK_BALANCE: &str = "0";

pub struct WalletLink<C> {
    connector: Arc<C>,
    store: Arc<WalletStore>,
    modal: Arc<ModalController>,
    sync: SessionSync,
    indexer: IndexerClient,
    transfers: TransferService<C>,
}

impl<C: WalletConnector + 'static> WalletLink<C> {
    /// Create a handle with a fresh store.
    pub fn new(connector: Arc<C>, config: &LinkConfig) -> WalletResult<Self> {
        Self::with_store(connector, config, Arc::new(WalletStore::new()))
    }

    /// Create a handle that mirrors into an existing application store.
    pub fn with_store(
        connector: Arc<C>,
        config: &LinkConfig,
        store: Arc<WalletStore>,
    ) -> WalletResult<Self> {
        let indexer = IndexerClient::new(&config.indexer)?;
        let tokens = TokenRegistry::with_overrides(&config.tokens);
        let modal = Arc::new(ModalController::new());
        let sync = SessionSync::new(store.clone(), modal.clone());
        let transfers = TransferService::new(
            connector.clone(),
            indexer.clone(),
            tokens,
            config.transfer.clone(),
        );

        let link = Self {
            connector,
            store,
            modal,
            sync,
            indexer,
            transfers,
        };
        link.sync();
        Ok(link)
    }

    pub fn modal_state(&self) -> ModalState {
        self.modal.state()
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn open_modal(&self) {
        self.modal.open();
    }

    pub fn close_modal(&self) {
        self.modal.close(CloseReason::ActionCancelled);
    }

    /// User-friendly address of the connected wallet, if any.
    pub fn address(&self) -> Option<String> {
        self.store.address()
    }

    pub fn store(&self) -> &Arc<WalletStore> {
        &self.store
    }

    pub fn tokens(&self) -> &TokenRegistry {
        self.transfers.tokens()
    }

    /// Pull the provider's current status into the store once.
    pub fn sync(&self) -> bool {
        let status = self.connector.status().borrow().clone();
        self.sync.apply(&status)
    }

    /// Keep the store in sync with the provider in the background.
    pub fn spawn_sync(&self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        self.sync.clone().spawn(self.connector.status(), shutdown)
    }

    /// Disconnect the provider, then clear the store.
    pub async fn disconnect(&self) -> WalletResult<()> {
        self.connector.disconnect().await.inspect_err(|e| {
            tracing::error!(error = %e, "Wallet disconnect failed");
        })?;
        self.store.disconnect();
        Ok(())
    }

    /// Build the request for a transfer from the connected wallet.
    pub async fn prepare_transaction(
        &self,
        request: &TransferRequest,
    ) -> WalletResult<PreparedTransfer> {
        let (address, network) = self.sender()?;
        self.transfers
            .prepare(TransferOrigin { address: &address, network }, request)
            .await
    }

    /// Send native TON, or a jetton when `request.coin` names one.
    pub async fn send_transaction(&self, request: &TransferRequest) -> WalletResult<TransferOutcome> {
        let (address, network) = self.sender().inspect_err(|e| {
            tracing::error!(error = %e, "Cannot send transaction");
        })?;
        self.transfers
            .send(TransferOrigin { address: &address, network }, request)
            .await
    }

    /// Jetton balance of `address`, `"0"` if the lookup fails for any reason.
    pub async fn fetch_token_balance(&self, address: &str, jetton_id: &str) -> String {
        match self.try_fetch_token_balance(address, jetton_id).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::error!(error = %e, address, jetton_id, "Failed to fetch token balance");
                FALLBACK_BALANCE.to_string()
            }
        }
    }

    /// Jetton balance of `address`, propagating failures.
    pub async fn try_fetch_token_balance(&self, address: &str, jetton_id: &str) -> WalletResult<String> {
        Ok(self.indexer.token_balance(address, jetton_id).await?)
    }

    /// Native balance of `address` in nanotons.
    pub async fn fetch_native_balance(&self, address: &str) -> WalletResult<u128> {
        Ok(self.indexer.account_balance(address).await?)
    }

    fn sender(&self) -> WalletResult<(String, Network)> {
        self.sync();
        let address = self.store.address().ok_or(WalletError::NotConnected)?;
        let network = self
            .connector
            .status()
            .borrow()
            .network()
            .ok_or(WalletError::NotConnected)?;
        Ok((address, network))
    }
}

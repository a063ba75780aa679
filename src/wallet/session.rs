//! Connection state mirrored from the provider into the application store.
//!
//! # Data Flow
//! ```text
//! WalletConnector::status() (watch)
//!     → SessionSync::apply
//!     → WalletStore (connected flag + user-friendly address)
//!     → ModalController closes with WalletSelected on connect
//! ```
//!
//! The store always reflects what the provider last reported: an address is
//! set on connect and cleared on disconnect.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::wallet::connector::ConnectionStatus;

/// Snapshot of the application-side wallet state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub connected: bool,
    pub address: Option<String>,
}

/// Application store for wallet state. Readers get cheap snapshots.
#[derive(Debug)]
pub struct WalletStore {
    state: ArcSwap<StoreState>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(StoreState::default()),
        }
    }

    pub fn snapshot(&self) -> Arc<StoreState> {
        self.state.load_full()
    }

    pub fn address(&self) -> Option<String> {
        self.state.load().address.clone()
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.rcu(|current| StoreState {
            connected,
            ..StoreState::clone(current)
        });
    }

    pub fn set_address(&self, address: impl Into<String>) {
        let address = address.into();
        self.state.rcu(|current| StoreState {
            address: Some(address.clone()),
            ..StoreState::clone(current)
        });
    }

    /// Clear everything.
    pub fn disconnect(&self) {
        self.state.store(Arc::new(StoreState::default()));
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the connect modal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalStatus {
    Opened,
    Closed,
}

/// Why the modal was last closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseReason {
    ActionCancelled,
    WalletSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModalState {
    pub status: ModalStatus,
    pub close_reason: Option<CloseReason>,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            status: ModalStatus::Closed,
            close_reason: None,
        }
    }
}

/// Open/close state of the wallet picker, observable by the UI layer.
#[derive(Debug)]
pub struct ModalController {
    state: watch::Sender<ModalState>,
}

impl ModalController {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ModalState::default());
        Self { state }
    }

    pub fn state(&self) -> ModalState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ModalState> {
        self.state.subscribe()
    }

    pub fn open(&self) {
        self.state.send_replace(ModalState {
            status: ModalStatus::Opened,
            close_reason: None,
        });
    }

    pub fn close(&self, reason: CloseReason) {
        self.state.send_replace(ModalState {
            status: ModalStatus::Closed,
            close_reason: Some(reason),
        });
    }
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies provider status to the store and modal.
#[derive(Debug, Clone)]
pub struct SessionSync {
    store: Arc<WalletStore>,
    modal: Arc<ModalController>,
}

impl SessionSync {
    pub fn new(store: Arc<WalletStore>, modal: Arc<ModalController>) -> Self {
        Self { store, modal }
    }

    /// Mirror `status` into the store. Returns true if the store changed.
    pub fn apply(&self, status: &ConnectionStatus) -> bool {
        let current = self.store.snapshot();

        match status.display_address() {
            Some(result) => {
                let address = match result {
                    Ok(friendly) => friendly,
                    Err(e) => {
                        tracing::warn!(error = %e, "Provider address not parseable, mirroring raw form");
                        match status {
                            ConnectionStatus::Connected { address, .. } => address.clone(),
                            ConnectionStatus::Disconnected => return false,
                        }
                    }
                };

                if current.connected && current.address.as_deref() == Some(address.as_str()) {
                    return false;
                }

                self.store.set_address(address.clone());
                self.store.set_connected(true);
                metrics::record_connection_change("connected");
                tracing::info!(address = %address, "Wallet address mirrored into store");

                if self.modal.state().status == ModalStatus::Opened {
                    self.modal.close(CloseReason::WalletSelected);
                }
                true
            }
            None => {
                if !current.connected && current.address.is_none() {
                    return false;
                }
                self.store.disconnect();
                metrics::record_connection_change("disconnected");
                tracing::info!("Wallet state cleared from store");
                true
            }
        }
    }

    /// Follow `status` until the provider goes away or `shutdown` fires.
    pub fn spawn(
        self,
        mut status: watch::Receiver<ConnectionStatus>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let initial = status.borrow_and_update().clone();
            self.apply(&initial);

            loop {
                tokio::select! {
                    changed = status.changed() => {
                        if changed.is_err() {
                            tracing::debug!("Provider status channel closed, stopping session sync");
                            break;
                        }
                        let latest = status.borrow_and_update().clone();
                        self.apply(&latest);
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("Session sync shutting down");
                        break;
                    }
                }
            }
        })
    }
}

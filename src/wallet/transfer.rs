//! Transfer preparation and submission.
//!
//! # Responsibilities
//! - Decide between a native transfer and a jetton transfer
//! - Resolve the sending wallet's jetton wallet through the indexer
//! - Build the wallet-connect request and hand it to the provider
//! - Log and propagate every failure

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use serde::Serialize;

use crate::config::TransferConfig;
use crate::indexer::IndexerClient;
use crate::observability::metrics;
use crate::wallet::address::{parse_address, user_friendly};
use crate::wallet::connector::{
    Network, SendTransactionRequest, SendTransactionResponse, TransactionMessage, WalletConnector,
};
use crate::wallet::payload::{
    build_jetton_transfer_body, encode_boc_base64, parse_amount, JettonTransfer, TransferStyle,
};
use crate::wallet::tokens::TokenRegistry;
use crate::wallet::types::WalletResult;

/// What the caller wants to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address.
    pub to: String,
    /// Amount in base units: nanotons for TON, jetton units otherwise.
    pub amount: String,
    /// Coin symbol; `None` or an unknown symbol means native TON.
    pub coin: Option<String>,
    /// Forward comment for jetton transfers.
    pub comment: Option<String>,
}

impl TransferRequest {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            coin: None,
            comment: None,
        }
    }

    pub fn with_coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = Some(coin.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A transfer ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreparedTransfer {
    /// Goes to the wallet for signing.
    Wallet(SendTransactionRequest),
    /// Goes to the indexer relay endpoint.
    Relay {
        to: String,
        token: String,
        amount: String,
    },
}

/// Result of a submitted transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum TransferOutcome {
    Signed(SendTransactionResponse),
    Relayed(serde_json::Value),
}

/// The party sending a transfer, as mirrored from the provider.
#[derive(Debug, Clone, Copy)]
pub struct TransferOrigin<'a> {
    pub address: &'a str,
    pub network: Network,
}

/// Builds and submits transfers on behalf of the connected wallet.
pub struct TransferService<C> {
    connector: Arc<C>,
    indexer: IndexerClient,
    tokens: TokenRegistry,
    config: TransferConfig,
}

impl<C: WalletConnector> TransferService<C> {
    pub fn new(
        connector: Arc<C>,
        indexer: IndexerClient,
        tokens: TokenRegistry,
        config: TransferConfig,
    ) -> Self {
        Self {
            connector,
            indexer,
            tokens,
            config,
        }
    }

    /// Prepare then submit `request`.
    pub async fn send(
        &self,
        origin: TransferOrigin<'_>,
        request: &TransferRequest,
    ) -> WalletResult<TransferOutcome> {
        let prepared = self.prepare(origin, request).await.inspect_err(|e| {
            tracing::error!(error = %e, to = %request.to, "Failed to prepare transaction");
        })?;
        self.submit(prepared).await
    }

    /// Build the request for `request` without submitting it.
    pub async fn prepare(
        &self,
        origin: TransferOrigin<'_>,
        request: &TransferRequest,
    ) -> WalletResult<PreparedTransfer> {
        let master = request
            .coin
            .as_deref()
            .and_then(|coin| self.tokens.resolve(coin));

        match master {
            Some(master) => match self.config.jetton_style {
                TransferStyle::IndexerRelay => {
                    parse_address(&request.to)?;
                    parse_amount(&request.amount)?;
                    Ok(PreparedTransfer::Relay {
                        to: request.to.trim().to_string(),
                        token: master.to_string(),
                        amount: request.amount.trim().to_string(),
                    })
                }
                TransferStyle::JettonCell => self
                    .prepare_jetton(origin, master, request)
                    .await
                    .map(PreparedTransfer::Wallet),
            },
            None => self.prepare_native(request).map(PreparedTransfer::Wallet),
        }
    }

    /// Submit a prepared transfer.
    pub async fn submit(&self, prepared: PreparedTransfer) -> WalletResult<TransferOutcome> {
        match prepared {
            PreparedTransfer::Wallet(request) => {
                let kind = if request.messages.iter().any(|m| m.payload.is_some()) {
                    "jetton"
                } else {
                    "native"
                };
                match self.connector.send_transaction(request).await {
                    Ok(response) => {
                        metrics::record_transaction(kind, "signed");
                        tracing::info!(kind, boc_len = response.boc.len(), "Transaction result");
                        Ok(TransferOutcome::Signed(response))
                    }
                    Err(e) => {
                        metrics::record_transaction(kind, "failed");
                        tracing::error!(kind, error = %e, "Transaction failed");
                        Err(e)
                    }
                }
            }
            PreparedTransfer::Relay { to, token, amount } => {
                match self.indexer.relay_token_transfer(&to, &token, &amount).await {
                    Ok(result) => {
                        metrics::record_transaction("relay", "accepted");
                        tracing::info!(to = %to, token = %token, "Relay transaction result");
                        Ok(TransferOutcome::Relayed(result))
                    }
                    Err(e) => {
                        metrics::record_transaction("relay", "failed");
                        tracing::error!(to = %to, token = %token, error = %e, "Failed to send token transaction");
                        Err(e.into())
                    }
                }
            }
        }
    }

    fn prepare_native(&self, request: &TransferRequest) -> WalletResult<SendTransactionRequest> {
        parse_address(&request.to)?;
        let amount = parse_amount(&request.amount)?;

        Ok(SendTransactionRequest {
            valid_until: self.valid_until(),
            network: None,
            from: None,
            messages: vec![TransactionMessage {
                address: request.to.trim().to_string(),
                amount: amount.to_string(),
                payload: None,
                state_init: None,
            }],
        })
    }

    async fn prepare_jetton(
        &self,
        origin: TransferOrigin<'_>,
        master: &str,
        request: &TransferRequest,
    ) -> WalletResult<SendTransactionRequest> {
        let owner = parse_address(origin.address)?;
        let destination = parse_address(&request.to)?;
        let amount = parse_amount(&request.amount)?;

        let jetton_wallet_raw = self
            .indexer
            .jetton_wallet_address(master, origin.address)
            .await?;
        let jetton_wallet = parse_address(&jetton_wallet_raw)?;
        tracing::debug!(jetton_wallet = %jetton_wallet_raw, master = %master, "Resolved sender jetton wallet");

        let body = build_jetton_transfer_body(&JettonTransfer {
            query_id: rand::random(),
            amount,
            destination,
            response_destination: owner,
            forward_ton_amount: BigUint::from(self.config.forward_nanotons),
            comment: request.comment.clone(),
        })?;

        Ok(SendTransactionRequest {
            valid_until: self.valid_until(),
            network: None,
            from: None,
            messages: vec![TransactionMessage {
                address: user_friendly(&jetton_wallet, origin.network, true),
                amount: self.config.jetton_attached_nanotons.to_string(),
                payload: Some(encode_boc_base64(body)?),
                state_init: None,
            }],
        })
    }

    fn valid_until(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        now.saturating_add(self.config.valid_for_secs)
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }
}

//! Transfer payload construction.
//!
//! Jetton transfers are internal messages to the sender's own jetton wallet
//! whose body is a TEP-74 `transfer`:
//!
//! ```text
//! transfer#0f8a7ea5 query_id:uint64 amount:(VarUInteger 16)
//!     destination:MsgAddress response_destination:MsgAddress
//!     custom_payload:(Maybe ^Cell) forward_ton_amount:(VarUInteger 16)
//!     forward_payload:(Either Cell ^Cell)
//! ```
//!
//! Cells and BOC serialization come from `tonlib-core`.

use base64::Engine;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tonlib_core::cell::{BagOfCells, Cell, CellBuilder};
use tonlib_core::TonAddress;

use crate::wallet::types::{WalletError, WalletResult};

/// TEP-74 `transfer` opcode.
pub const JETTON_TRANSFER_OP: u32 = 0x0f8a7ea5;

/// Opcode of a plain text comment.
pub const COMMENT_OP: u32 = 0;

/// Longest comment that fits in one cell next to its opcode: (1023 - 32) / 8.
pub const MAX_COMMENT_BYTES: usize = 123;

/// VarUInteger 16 holds at most 15 bytes.
const MAX_COINS_BITS: u64 = 120;

/// How jetton transfers are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferStyle {
    /// Build the transfer cell locally and send it through the wallet.
    #[default]
    JettonCell,
    /// Post `{token, amount}` to the indexer relay endpoint.
    IndexerRelay,
}

/// Parse a base-unit amount. Only plain decimal digits are accepted.
pub fn parse_amount(raw: &str) -> WalletResult<BigUint> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::InvalidAmount(raw.to_string()));
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| WalletError::InvalidAmount(raw.to_string()))?;
    if value.bits() > MAX_COINS_BITS {
        return Err(WalletError::InvalidAmount(raw.to_string()));
    }
    Ok(value)
}

/// Parameters of a single jetton transfer body.
#[derive(Debug, Clone)]
pub struct JettonTransfer {
    pub query_id: u64,
    /// Jetton amount in base units.
    pub amount: BigUint,
    /// Owner that receives the jettons.
    pub destination: TonAddress,
    /// Where excess TON is returned, normally the sender.
    pub response_destination: TonAddress,
    /// Nanotons forwarded to `destination` with the notification.
    pub forward_ton_amount: BigUint,
    /// Optional text attached as forward payload.
    pub comment: Option<String>,
}

/// Build a text comment cell.
pub fn build_comment_cell(text: &str) -> WalletResult<Cell> {
    if text.len() > MAX_COMMENT_BYTES {
        return Err(WalletError::CommentTooLong {
            len: text.len(),
            max: MAX_COMMENT_BYTES,
        });
    }

    let mut builder = CellBuilder::new();
    builder.store_u32(32, COMMENT_OP)?;
    builder.store_slice(text.as_bytes())?;
    Ok(builder.build()?)
}

/// Build the `transfer` body for the sender's jetton wallet.
pub fn build_jetton_transfer_body(transfer: &JettonTransfer) -> WalletResult<Cell> {
    let mut builder = CellBuilder::new();
    builder
        .store_u32(32, JETTON_TRANSFER_OP)?
        .store_u64(64, transfer.query_id)?
        .store_coins(&transfer.amount)?
        .store_address(&transfer.destination)?
        .store_address(&transfer.response_destination)?
        .store_bit(false)? // no custom payload
        .store_coins(&transfer.forward_ton_amount)?;

    match &transfer.comment {
        Some(text) => {
            let comment = build_comment_cell(text)?;
            builder.store_bit(true)?.store_reference(&comment.to_arc())?;
        }
        None => {
            builder.store_bit(false)?;
        }
    }

    Ok(builder.build()?)
}

/// Serialize `cell` as a base64 BOC, the form wallets expect in `payload`.
pub fn encode_boc_base64(cell: Cell) -> WalletResult<String> {
    let bytes = BagOfCells::from_root(cell).serialize(true)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

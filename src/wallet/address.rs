//! Address parsing and user-friendly formatting.

use std::str::FromStr;

use tonlib_core::TonAddress;

use crate::wallet::connector::Network;
use crate::wallet::types::{WalletError, WalletResult};

/// Parse a raw (`wc:hex`) or user-friendly (base64) address.
pub fn parse_address(raw: &str) -> WalletResult<TonAddress> {
    TonAddress::from_str(raw.trim()).map_err(|e| WalletError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Base64url form of `address`. Wallets are shown non-bounceable, contracts bounceable.
pub fn user_friendly(address: &TonAddress, network: Network, bounceable: bool) -> String {
    address.to_base64_url_flags(!bounceable, network == Network::Testnet)
}

/// Convert whatever the provider reports into the form shown to users.
pub fn display_address(raw: &str, network: Network) -> WalletResult<String> {
    Ok(user_friendly(&parse_address(raw)?, network, false))
}

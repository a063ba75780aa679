//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate indexer URLs and timeouts
//! - Check that token overrides carry parseable addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LinkConfig → Result<(), Vec<ValidationError>>

use std::str::FromStr;

use tonlib_core::TonAddress;

use crate::config::schema::LinkConfig;

/// Longest validity window accepted for a transfer request (one day).
pub const MAX_VALID_FOR_SECS: u64 = 24 * 60 * 60;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid indexer URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("token '{symbol}' has invalid master address '{address}'")]
    InvalidTokenAddress { symbol: String, address: String },

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &LinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let urls = std::iter::once(&config.indexer.base_url).chain(config.indexer.failover_urls.iter());
    for url in urls {
        match url::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => errors.push(ValidationError::InvalidUrl {
                url: url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.indexer.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "indexer.timeout_secs" });
    }
    if config.transfer.valid_for_secs == 0 {
        errors.push(ValidationError::Zero { field: "transfer.valid_for_secs" });
    } else if config.transfer.valid_for_secs > MAX_VALID_FOR_SECS {
        errors.push(ValidationError::TooLarge {
            field: "transfer.valid_for_secs",
            max: MAX_VALID_FOR_SECS,
        });
    }
    if config.transfer.jetton_attached_nanotons == 0 {
        errors.push(ValidationError::Zero { field: "transfer.jetton_attached_nanotons" });
    }

    for (symbol, address) in &config.tokens {
        if TonAddress::from_str(address).is_err() {
            errors.push(ValidationError::InvalidTokenAddress {
                symbol: symbol.clone(),
                address: address.clone(),
            });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Metrics collection.
//!
//! # Metrics
//! - `indexer_requests_total` (counter): indexer calls by endpoint
//! - `indexer_request_failures_total` (counter): failed calls by endpoint, reason
//! - `wallet_transactions_total` (counter): submitted transactions by kind, outcome
//! - `wallet_connection_changes_total` (counter): connect/disconnect transitions

/// Record an indexer request attempt.
pub fn record_indexer_request(endpoint: &'static str) {
    metrics::counter!("indexer_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record a failed indexer request.
pub fn record_indexer_failure(endpoint: &'static str, reason: &'static str) {
    metrics::counter!(
        "indexer_request_failures_total",
        "endpoint" => endpoint,
        "reason" => reason
    )
    .increment(1);
}

/// Record a transaction handed to the wallet or the relay.
pub fn record_transaction(kind: &'static str, outcome: &'static str) {
    metrics::counter!(
        "wallet_transactions_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a connection state transition mirrored into the store.
pub fn record_connection_change(state: &'static str) {
    metrics::counter!("wallet_connection_changes_total", "state" => state).increment(1);
}

//! Indexer HTTP client with timeout and failover handling.
//!
//! # Responsibilities
//! - Query jetton and native balances
//! - Derive a jetton wallet address for an owner
//! - Forward legacy relay transfers
//! - Handle timeouts and network errors, failing over between endpoints

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::instrument;
use url::Url;

use crate::config::IndexerConfig;
use crate::indexer::types::{
    AccountInfo, IndexerError, IndexerResult, JettonBalance, MethodExecution, RelayTransferRequest,
};
use crate::observability::metrics;

/// HTTP client for a tonapi-compatible indexer.
#[derive(Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    /// Base URLs without trailing slash (primary first).
    endpoints: Vec<String>,
    api_key: Option<String>,
    timeout_duration: Duration,
}

impl IndexerClient {
    /// Create a new indexer client.
    ///
    /// The primary URL must parse; invalid failover URLs are skipped with a warning.
    pub fn new(config: &IndexerConfig) -> IndexerResult<Self> {
        let primary = normalize_endpoint(&config.base_url)?;
        let mut endpoints = vec![primary];

        for url in &config.failover_urls {
            match normalize_endpoint(url) {
                Ok(endpoint) => endpoints.push(endpoint),
                Err(e) => tracing::warn!(url = %url, error = %e, "Ignoring invalid failover indexer URL"),
            }
        }

        let timeout_duration = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .user_agent(concat!("ton-wallet-link/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            primary = %endpoints[0],
            failovers = endpoints.len() - 1,
            timeout_secs = config.timeout_secs,
            "Indexer client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            api_key: config.api_key.clone(),
            timeout_duration,
        })
    }

    /// Fetch the jetton balance entry of `account` for jetton master `jetton`.
    #[instrument(skip(self))]
    pub async fn jetton_balance(&self, account: &str, jetton: &str) -> IndexerResult<JettonBalance> {
        self.get_json("jetton_balance", &["v2", "accounts", account, "jettons", jetton], &[])
            .await
    }

    /// Fetch the jetton balance of `account` as a base-unit decimal string.
    pub async fn token_balance(&self, account: &str, jetton: &str) -> IndexerResult<String> {
        Ok(self.jetton_balance(account, jetton).await?.balance)
    }

    /// Fetch the native balance of `account` in nanotons.
    #[instrument(skip(self))]
    pub async fn account_balance(&self, account: &str) -> IndexerResult<u128> {
        let info: AccountInfo = self.get_json("account", &["v2", "accounts", account], &[]).await?;
        Ok(info.balance)
    }

    /// Derive the jetton wallet address that `owner` holds for jetton master `master`.
    ///
    /// Runs `get_wallet_address` on the master. If the indexer cannot decode the
    /// result, falls back to the wallet reported by the balance endpoint.
    #[instrument(skip(self))]
    pub async fn jetton_wallet_address(&self, master: &str, owner: &str) -> IndexerResult<String> {
        let path = ["v2", "blockchain", "accounts", master, "methods", "get_wallet_address"];
        let exec: MethodExecution = self
            .get_json("get_wallet_address", &path, &[("args", owner)])
            .await?;

        if let Some(address) = exec.jetton_wallet_address() {
            return Ok(address.to_string());
        }

        tracing::debug!(
            exit_code = exec.exit_code,
            "get_wallet_address not decoded, falling back to balance endpoint"
        );
        self.jetton_balance(owner, master)
            .await?
            .wallet_address
            .map(|wallet| wallet.address)
            .ok_or_else(|| IndexerError::Decode("jetton wallet address missing".to_string()))
    }

    /// Hand a token transfer to the indexer relay endpoint.
    ///
    /// Not idempotent, so only the primary endpoint is used.
    #[instrument(skip(self))]
    pub async fn relay_token_transfer(
        &self,
        to: &str,
        token: &str,
        amount: &str,
    ) -> IndexerResult<serde_json::Value> {
        let endpoint = "relay_transfer";
        let url = endpoint_url(&self.endpoints[0], &["address", to, "send"])?;
        let body = RelayTransferRequest {
            token: token.to_string(),
            amount: amount.to_string(),
        };

        metrics::record_indexer_request(endpoint);
        let request = self.request(Method::POST, url).json(&body);
        self.execute(endpoint, request).await
    }

    /// GET a JSON document, trying each endpoint in order.
    ///
    /// `path` holds raw segments; each one is percent-encoded on its own.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> IndexerResult<T> {
        let mut last_error = None;

        for (i, base) in self.endpoints.iter().enumerate() {
            let url = endpoint_url(base, path)?;
            metrics::record_indexer_request(endpoint);
            let request = self.request(Method::GET, url).query(query);

            match self.execute(endpoint, request).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(endpoint_idx = i, error = %e, "Indexer error, trying next endpoint");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| IndexerError::Decode("no indexer endpoints".to_string())))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Send a request under the timeout and decode a JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> IndexerResult<T> {
        let result = timeout(self.timeout_duration, send_and_decode::<T>(request)).await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(_) => Err(IndexerError::Timeout(self.timeout_duration.as_secs())),
        };

        if let Err(e) = &outcome {
            metrics::record_indexer_failure(endpoint, failure_reason(e));
        }
        outcome
    }

    /// Base URLs in the order they are tried.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

impl std::fmt::Debug for IndexerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerClient")
            .field("endpoints", &self.endpoints)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

async fn send_and_decode<T: DeserializeOwned>(request: RequestBuilder) -> IndexerResult<T> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(IndexerError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str::<T>(&text).map_err(|e| IndexerError::Decode(e.to_string()))
}

/// Append `segments` to `base`, encoding characters such as `/` inside a segment.
fn endpoint_url(base: &str, segments: &[&str]) -> IndexerResult<Url> {
    let invalid = |reason: String| IndexerError::Endpoint {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn normalize_endpoint(raw: &str) -> IndexerResult<String> {
    let parsed = Url::parse(raw).map_err(|e| IndexerError::Endpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(IndexerError::Endpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn failure_reason(error: &IndexerError) -> &'static str {
    match error {
        IndexerError::Endpoint { .. } => "endpoint",
        IndexerError::Http(_) => "transport",
        IndexerError::Status { .. } => "status",
        IndexerError::Timeout(_) => "timeout",
        IndexerError::Decode(_) => "decode",
    }
}

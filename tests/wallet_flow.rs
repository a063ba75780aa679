//! End-to-end wallet flows against a mock indexer and an in-process wallet.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use tokio::sync::broadcast;
use tonlib_core::TonAddress;

use ton_wallet_link::wallet::address::user_friendly;
use ton_wallet_link::wallet::{
    ChannelConnector, CoinSymbol, Network, PreparedTransfer, SendTransactionRequest, SendTransactionResponse,
    TransferOutcome, TransferRequest, TransferStyle, WalletConnector, WalletError, WalletLink,
};

mod common;

const OWNER: &str = "0:abababababababababababababababababababababababababababababababab";
const RECIPIENT: &str = "0:0cd8a583a7d94dd18bf1bdf49b234af28c15f033bd2b6a4a4d2076ee1136ad45";
const JETTON_WALLET: &str = "0:1111111111111111111111111111111111111111111111111111111111111111";

fn connected_link(
    config: &ton_wallet_link::LinkConfig,
) -> (
    Arc<ChannelConnector>,
    tokio::sync::mpsc::Receiver<ton_wallet_link::wallet::WalletRequest>,
    WalletLink<ChannelConnector>,
) {
    let (connector, rx) = ChannelConnector::new(4);
    let connector = Arc::new(connector);
    connector.connect(OWNER, Network::Mainnet);
    let link = WalletLink::new(connector.clone(), config).unwrap();
    (connector, rx, link)
}

#[tokio::test]
async fn test_native_transfer_reaches_wallet() {
    let indexer = common::start_mock_indexer(|_| (500, "{}".to_string())).await;
    let (_connector, mut rx, link) = connected_link(&common::config_for(&indexer.base_url()));

    let wallet = tokio::spawn(async move {
        let pending = rx.recv().await.unwrap();
        let request = pending.request().clone();
        pending.approve("signed-native");
        request
    });

    let outcome = link
        .send_transaction(&TransferRequest::new(RECIPIENT, "2000000000"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        TransferOutcome::Signed(SendTransactionResponse {
            boc: "signed-native".to_string()
        })
    );

    let request: SendTransactionRequest = wallet.await.unwrap();
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].address, RECIPIENT);
    assert_eq!(request.messages[0].amount, "2000000000");
    assert!(request.messages[0].payload.is_none());

    // Native transfers never touch the indexer.
    assert!(indexer.requests().is_empty());
}

#[tokio::test]
async fn test_jetton_transfer_goes_to_jetton_wallet() {
    let indexer = common::start_mock_indexer(|req| {
        if req.path().ends_with("/methods/get_wallet_address") {
            (
                200,
                format!(
                    r#"{{"success":true,"exit_code":0,"decoded":{{"jetton_wallet_address":"{}"}}}}"#,
                    JETTON_WALLET
                ),
            )
        } else {
            (404, r#"{"error":"not found"}"#.to_string())
        }
    })
    .await;
    let (_connector, mut rx, link) = connected_link(&common::config_for(&indexer.base_url()));

    let wallet = tokio::spawn(async move {
        let pending = rx.recv().await.unwrap();
        let request = pending.request().clone();
        pending.approve("signed-jetton");
        request
    });

    let request = TransferRequest::new(RECIPIENT, "1000").with_coin("gm").with_comment("gm!");
    let outcome = link.send_transaction(&request).await.unwrap();
    assert!(matches!(outcome, TransferOutcome::Signed(ref r) if r.boc == "signed-jetton"));

    let sent = wallet.await.unwrap();
    let message = &sent.messages[0];
    let jetton_wallet = TonAddress::from_str(JETTON_WALLET).unwrap();
    assert_eq!(message.address, user_friendly(&jetton_wallet, Network::Mainnet, true));
    assert_eq!(message.amount, "50000000");

    let payload = message.payload.as_ref().expect("jetton transfer carries a payload");
    let boc = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(&boc[..4], &[0xb5, 0xee, 0x9c, 0x72]);

    let requests = indexer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].path(),
        format!(
            "/v2/blockchain/accounts/{}/methods/get_wallet_address",
            CoinSymbol::Gm.master_address()
        )
    );
    assert!(requests[0].target.contains("args="));
}

#[tokio::test]
async fn test_jetton_wallet_falls_back_to_balance_endpoint() {
    let indexer = common::start_mock_indexer(|req| {
        if req.path().ends_with("/methods/get_wallet_address") {
            (200, r#"{"success":false,"exit_code":11}"#.to_string())
        } else {
            (
                200,
                format!(
                    r#"{{"balance":"5","wallet_address":{{"address":"{}","is_scam":false,"is_wallet":false}}}}"#,
                    JETTON_WALLET
                ),
            )
        }
    })
    .await;
    let (_connector, mut rx, link) = connected_link(&common::config_for(&indexer.base_url()));

    let wallet = tokio::spawn(async move {
        let pending = rx.recv().await.unwrap();
        let address = pending.request().messages[0].address.clone();
        pending.approve("ok");
        address
    });

    link.send_transaction(&TransferRequest::new(RECIPIENT, "5").with_coin("DFC"))
        .await
        .unwrap();

    let jetton_wallet = TonAddress::from_str(JETTON_WALLET).unwrap();
    assert_eq!(
        wallet.await.unwrap(),
        user_friendly(&jetton_wallet, Network::Mainnet, true)
    );
    assert_eq!(indexer.requests().len(), 2);
}

#[tokio::test]
async fn test_relay_style_posts_to_indexer() {
    let indexer =
        common::start_mock_indexer(|_| (200, r#"{"ok":true,"hash":"abc"}"#.to_string())).await;
    let mut config = common::config_for(&indexer.base_url());
    config.transfer.jetton_style = TransferStyle::IndexerRelay;
    let (_connector, _rx, link) = connected_link(&config);

    let outcome = link
        .send_transaction(&TransferRequest::new(RECIPIENT, "42").with_coin("ARBUZ"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        TransferOutcome::Relayed(serde_json::json!({"ok": true, "hash": "abc"}))
    );

    let requests = indexer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path(), format!("/address/{}/send", RECIPIENT));
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["token"], CoinSymbol::Arbuz.master_address());
    assert_eq!(body["amount"], "42");
}

#[tokio::test]
async fn test_relay_recipient_is_path_encoded() {
    let indexer = common::start_mock_indexer(|_| (200, r#"{"ok":true}"#.to_string())).await;
    let mut config = common::config_for(&indexer.base_url());
    config.transfer.jetton_style = TransferStyle::IndexerRelay;
    let (_connector, _rx, link) = connected_link(&config);

    let raw = format!("0:{}", "ff".repeat(32));
    let recipient = TonAddress::from_str(&raw).unwrap().to_base64_std();
    assert!(recipient.contains('/'));

    link.send_transaction(&TransferRequest::new(recipient.as_str(), "7").with_coin("GM"))
        .await
        .unwrap();

    let requests = indexer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path(),
        format!("/address/{}/send", recipient.replace('/', "%2F"))
    );
}

#[tokio::test]
async fn test_relay_rejects_bad_recipient_before_posting() {
    let indexer = common::start_mock_indexer(|_| (200, r#"{"ok":true}"#.to_string())).await;
    let mut config = common::config_for(&indexer.base_url());
    config.transfer.jetton_style = TransferStyle::IndexerRelay;
    let (_connector, _rx, link) = connected_link(&config);

    let err = link
        .send_transaction(&TransferRequest::new("../../admin", "7").with_coin("GM"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAddress { .. }));
    assert!(indexer.requests().is_empty());
}

#[tokio::test]
async fn test_oversized_validity_window_does_not_panic() {
    let indexer = common::start_mock_indexer(|_| (500, "{}".to_string())).await;
    let mut config = common::config_for(&indexer.base_url());
    config.transfer.valid_for_secs = u64::MAX;
    let (_connector, _rx, link) = connected_link(&config);

    let prepared = link
        .prepare_transaction(&TransferRequest::new(RECIPIENT, "1"))
        .await
        .unwrap();
    assert!(matches!(prepared, PreparedTransfer::Wallet(ref tx) if tx.valid_until == u64::MAX));
}

#[tokio::test]
async fn test_relay_failure_is_propagated() {
    let indexer = common::start_mock_indexer(|_| (500, r#"{"error":"boom"}"#.to_string())).await;
    let mut config = common::config_for(&indexer.base_url());
    config.transfer.jetton_style = TransferStyle::IndexerRelay;
    let (_connector, _rx, link) = connected_link(&config);

    let err = link
        .send_transaction(&TransferRequest::new(RECIPIENT, "1").with_coin("M5"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Indexer(_)));
    // POST is never retried.
    assert_eq!(indexer.requests().len(), 1);
}

#[tokio::test]
async fn test_wallet_rejection_is_propagated() {
    let indexer = common::start_mock_indexer(|_| (500, "{}".to_string())).await;
    let (_connector, mut rx, link) = connected_link(&common::config_for(&indexer.base_url()));

    tokio::spawn(async move {
        rx.recv().await.unwrap().reject("user declined");
    });

    let err = link
        .send_transaction(&TransferRequest::new(RECIPIENT, "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Rejected(_)));
}

#[tokio::test]
async fn test_background_sync_mirrors_connect_and_disconnect() {
    let (connector, _rx) = ChannelConnector::new(1);
    let connector = Arc::new(connector);
    let link = WalletLink::new(connector.clone(), &common::config_for("http://127.0.0.1:9")).unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = link.spawn_sync(shutdown_rx);

    connector.connect(OWNER, Network::Testnet);
    wait_until(|| link.address().is_some()).await;
    let owner = TonAddress::from_str(OWNER).unwrap();
    assert_eq!(link.address().unwrap(), user_friendly(&owner, Network::Testnet, false));

    connector.disconnect().await.unwrap();
    wait_until(|| link.address().is_none()).await;
    assert!(!link.store().snapshot().connected);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

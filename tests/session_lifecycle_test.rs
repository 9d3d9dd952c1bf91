mod common;

use std::sync::Arc;
use std::time::Duration;

use degen_wallet::config::SessionConfig;
use degen_wallet::error::{ProviderError, SessionError};
use degen_wallet::provider::{codes, methods, ChainProvider, MockProvider};
use degen_wallet::session::WalletSession;
use tempfile::TempDir;

use common::{init_logging, session_with, storage_in, wait_until, ADDRESS};

#[tokio::test]
async fn test_disconnect_flag_suppresses_auto_reconnect() {
    init_logging();
    let dir = TempDir::new().unwrap();
    storage_in(&dir).set_disconnect_flag().unwrap();

    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    // The account query must not even be issued.
    assert_eq!(provider.calls_for(methods::ETH_ACCOUNTS), 0);

    let status = session.status();
    assert!(!status.state.is_connected);
    assert!(status.state.address.is_empty());
}

#[tokio::test]
async fn test_connect_clears_suppression_and_enables_auto_reconnect() {
    init_logging();
    let dir = TempDir::new().unwrap();
    storage_in(&dir).set_disconnect_flag().unwrap();

    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();
    assert!(!session.status().state.is_connected);

    session.connect().await.unwrap();
    assert!(!storage_in(&dir).disconnect_flag());

    // A fresh session over the same storage and provider must restore the
    // connection on its own.
    let fresh = session_with(&provider, &dir);
    fresh.initialize().await.unwrap();

    let status = fresh.status();
    assert!(status.state.is_connected);
    assert_eq!(status.state.address, ADDRESS.to_lowercase());
    assert_eq!(status.state.chain_id, "0x38");
}

#[tokio::test]
async fn test_empty_accounts_changed_is_full_disconnect() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();
    session.connect().await.unwrap();
    assert_eq!(session.whitelist().entries().unwrap().len(), 1);

    session.handle_accounts_changed(vec![]);

    let status = session.status();
    assert!(!status.state.is_connected);
    assert!(status.state.address.is_empty());
    assert!(storage_in(&dir).disconnect_flag());
    assert!(session.whitelist().entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_accounts_changed_event_flows_through_the_pump() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();
    assert!(session.status().state.is_connected);

    provider.emit_accounts_changed(vec![]);
    wait_until(|| !session.status().state.is_connected).await;
    assert!(storage_in(&dir).disconnect_flag());
}

#[tokio::test]
async fn test_account_switch_adopts_new_address_and_clears_flag() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    // Flag set by an explicit disconnect, then the user picks another
    // account in the wallet UI.
    session.disconnect().unwrap();
    session.handle_accounts_changed(vec![
        "0xFFFF000000000000000000000000000000005678".to_string(),
    ]);

    let status = session.status();
    assert!(status.state.is_connected);
    assert_eq!(
        status.state.address,
        "0xffff000000000000000000000000000000005678"
    );
    assert!(!storage_in(&dir).disconnect_flag());
}

#[tokio::test]
async fn test_chain_changed_resets_and_reinitializes() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();
    session.set_selector_open(true);

    provider.emit_chain_changed("0x61");
    wait_until(|| {
        let status = session.status();
        status.state.chain_id == "0x61" && status.state.is_connected
    })
    .await;

    let status = session.status();
    // Volatile state was rebuilt from the provider, selector included.
    assert!(status.state.is_connected);
    assert!(!status.state.is_selector_open);
    assert!(!status.is_correct_network);
}

#[tokio::test]
async fn test_connect_without_provider_is_unavailable() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let session = WalletSession::new(None, storage_in(&dir), common::test_config(&dir));
    session.initialize().await.unwrap();

    assert!(matches!(
        session.connect().await,
        Err(SessionError::ProviderUnavailable)
    ));
}

#[tokio::test]
async fn test_connect_with_zero_accounts_fails() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    assert!(matches!(
        session.connect().await,
        Err(SessionError::NoAccounts)
    ));
    assert!(!session.status().state.is_connecting);
}

#[tokio::test]
async fn test_is_connecting_resets_on_success_and_failure() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    session.connect().await.unwrap();
    assert!(!session.status().state.is_connecting);

    provider.fail_next(
        methods::ETH_REQUEST_ACCOUNTS,
        ProviderError::new(codes::USER_REJECTED, "User rejected the request"),
    );
    assert!(session.connect().await.is_err());
    assert!(!session.status().state.is_connecting);
}

#[tokio::test]
async fn test_overlapping_connect_is_rejected() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");
    provider.set_delay_ms(methods::ETH_REQUEST_ACCOUNTS, 300);

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    let racing = session.clone();
    let first = tokio::spawn(async move { racing.connect().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(matches!(
        session.connect().await,
        Err(SessionError::OperationInProgress)
    ));

    first.await.unwrap().unwrap();
    assert!(session.status().state.is_connected);
}

#[tokio::test]
async fn test_late_connect_completion_after_disconnect_is_discarded() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");
    provider.set_delay_ms(methods::ETH_REQUEST_ACCOUNTS, 300);

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    let racing = session.clone();
    let pending = tokio::spawn(async move { racing.connect().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    session.disconnect().unwrap();

    // The wallet's late approval must not resurrect the session.
    assert!(matches!(
        pending.await.unwrap(),
        Err(SessionError::Superseded)
    ));

    let status = session.status();
    assert!(!status.state.is_connected);
    assert!(status.state.address.is_empty());
    assert!(storage_in(&dir).disconnect_flag());
}

#[tokio::test]
async fn test_hung_provider_request_times_out() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");
    provider.set_delay_ms(methods::ETH_REQUEST_ACCOUNTS, 1_500);

    let config = SessionConfig {
        request_timeout_secs: 1,
        ..common::test_config(&dir)
    };
    let session = WalletSession::new(
        Some(provider.clone() as Arc<dyn ChainProvider>),
        storage_in(&dir),
        config,
    );
    session.initialize().await.unwrap();

    assert!(matches!(
        session.connect().await,
        Err(SessionError::RequestTimeout(1))
    ));
    assert!(!session.status().state.is_connecting);
}

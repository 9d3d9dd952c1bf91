mod common;

use std::sync::Arc;

use degen_wallet::provider::MockProvider;
use degen_wallet::storage::WhitelistStatus;
use degen_wallet::whitelist::WhitelistRegistrar;
use tempfile::TempDir;

use common::{init_logging, session_with, storage_in, ADDRESS};

#[test]
fn test_register_twice_leaves_one_entry() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let registrar = WhitelistRegistrar::new(storage_in(&dir));

    assert!(registrar.register(&ADDRESS.to_lowercase(), None).unwrap());
    assert!(!registrar.register(&ADDRESS.to_lowercase(), None).unwrap());

    let entries = registrar.entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address, ADDRESS.to_lowercase());
    assert_eq!(entries[0].status, WhitelistStatus::Pending);
    assert!(entries[0].tx_hash.is_none());
}

#[test]
fn test_entry_with_tx_hash_is_confirmed() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let registrar = WhitelistRegistrar::new(storage_in(&dir));

    registrar
        .register("0xabc", Some("0xdeadbeef".to_string()))
        .unwrap();

    let entries = registrar.entries().unwrap();
    assert_eq!(entries[0].status, WhitelistStatus::Confirmed);
    assert_eq!(entries[0].tx_hash.as_deref(), Some("0xdeadbeef"));
}

#[tokio::test]
async fn test_connect_registers_address_exactly_once() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();

    session.connect().await.unwrap();
    session.connect().await.unwrap();

    let entries = session.whitelist().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address, ADDRESS.to_lowercase());
}

#[tokio::test]
async fn test_disconnect_wipes_whitelist_cache() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(MockProvider::new());
    provider.set_accounts(vec![ADDRESS.to_string()]);
    provider.set_chain_id("0x38");

    let session = session_with(&provider, &dir);
    session.initialize().await.unwrap();
    session.connect().await.unwrap();
    assert!(session
        .whitelist()
        .is_registered(&ADDRESS.to_lowercase())
        .unwrap());

    session.disconnect().unwrap();
    assert!(session.whitelist().entries().unwrap().is_empty());
}

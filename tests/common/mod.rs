#![allow(dead_code)]

use std::sync::Arc;

use degen_wallet::chain::ChainDescriptor;
use degen_wallet::config::SessionConfig;
use degen_wallet::provider::{ChainProvider, MockProvider};
use degen_wallet::session::WalletSession;
use degen_wallet::storage::Storage;
use tempfile::TempDir;

/// Checksummed test account; the session is expected to lowercase it.
pub const ADDRESS: &str = "0xAbCd000000000000000000000000000000001234";

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

pub fn test_config(dir: &TempDir) -> SessionConfig {
    SessionConfig {
        target_chain: ChainDescriptor::bsc(),
        provider_rpc_url: None,
        whitelist_api_url: None,
        data_dir: dir.path().to_path_buf(),
        request_timeout_secs: 2,
    }
}

pub fn storage_in(dir: &TempDir) -> Storage {
    Storage::new_with_base_dir(dir.path().to_path_buf())
}

pub fn session_with(provider: &Arc<MockProvider>, dir: &TempDir) -> Arc<WalletSession> {
    WalletSession::new(
        Some(provider.clone() as Arc<dyn ChainProvider>),
        storage_in(dir),
        test_config(dir),
    )
}

/// Poll until the condition holds; panics after ~2 seconds.
pub async fn wait_until<F: Fn() -> bool>(cond: F) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("condition not met within deadline");
}

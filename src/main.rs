use std::env;
use std::sync::Arc;

use degen_wallet::api::server;
use degen_wallet::config::SessionConfig;
use degen_wallet::provider::{ChainProvider, HttpProvider};
use degen_wallet::session::WalletSession;
use degen_wallet::storage::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger (set RUST_LOG=debug for verbose output, RUST_LOG=info for normal)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SessionConfig::from_env();

    let provider: Option<Arc<dyn ChainProvider>> = config
        .provider_rpc_url
        .as_deref()
        .map(|url| Arc::new(HttpProvider::new(url)) as Arc<dyn ChainProvider>);
    if provider.is_none() {
        log::warn!("PROVIDER_RPC_URL not set; connect requests will fail until one is configured");
    }

    let storage = Storage::new_with_base_dir(config.data_dir.clone());
    let session = WalletSession::new(provider, storage, config);
    session.initialize().await?;

    // Read bind address from environment variable, default to 0.0.0.0:3000
    let addr = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    log::info!("Starting wallet session service on {}", addr);
    server::start_server(session, &addr).await?;
    Ok(())
}

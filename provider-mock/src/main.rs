/// Provider Mock Server
///
/// A lightweight mock of a wallet provider's JSON-RPC surface with
/// scriptable accounts, chains, and error injection. Designed for testing
/// and development of the session daemon.
use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use provider_mock::state::MockWallet;
use provider_mock::server::run_server;

#[derive(Debug)]
struct Config {
    // Initial wallet state
    chain_id: String,

    // Server
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let chain_id = env::var("MOCK_CHAIN_ID").unwrap_or_else(|_| "0x1".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8545".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            chain_id,
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Provider Mock Server...");

    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!("Initial chain: {}", config.chain_id);
    log::info!(
        "Server will listen on {}:{}",
        config.server_host,
        config.server_port
    );

    let wallet = Arc::new(MockWallet::new(&config.chain_id));

    run_server(wallet, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}

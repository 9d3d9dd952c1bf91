/// Session service configuration from environment variables
///
/// Controls the target chain, the upstream provider endpoint, and the
/// whitelist backend. Defaults to BNB Smart Chain mainnet.
use std::env;
use std::path::PathBuf;

use crate::chain::ChainDescriptor;

/// Default deadline for a single provider request. Interactive prompts can
/// take a while, but they must not hang the session forever.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// The chain the application requires the wallet to be on.
    pub target_chain: ChainDescriptor,
    /// JSON-RPC endpoint of the wallet provider bridge (optional).
    pub provider_rpc_url: Option<String>,
    /// Whitelist backend base URL (optional; registration is local-only
    /// without it).
    pub whitelist_api_url: Option<String>,
    /// Base directory for persisted session data.
    pub data_dir: PathBuf,
    /// Per-request deadline for provider calls, in seconds.
    pub request_timeout_secs: u64,
}

impl SessionConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CHAIN_NETWORK`: "mainnet" (default) or "testnet"
    /// - `PROVIDER_RPC_URL`: wallet provider bridge endpoint (optional)
    /// - `WHITELIST_API_URL`: whitelist backend base URL (optional)
    /// - `DATA_DIR`: session data directory (default "./data")
    /// - `REQUEST_TIMEOUT_SECS`: provider request deadline (default 30)
    pub fn from_env() -> Self {
        let network_str = env::var("CHAIN_NETWORK")
            .unwrap_or_else(|_| "mainnet".to_string())
            .to_lowercase();

        let target_chain = match network_str.as_str() {
            "testnet" => {
                log::info!("🔧 Targeting BNB Smart Chain TESTNET");
                ChainDescriptor::bsc_testnet()
            }
            "mainnet" | "" => {
                log::info!("🌐 Targeting BNB Smart Chain mainnet");
                ChainDescriptor::bsc()
            }
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to mainnet", other);
                ChainDescriptor::bsc()
            }
        };

        let provider_rpc_url = env::var("PROVIDER_RPC_URL").ok();
        if let Some(ref url) = provider_rpc_url {
            log::info!("🔗 Provider bridge URL: {}", url);
        }

        let whitelist_api_url = env::var("WHITELIST_API_URL").ok();
        if let Some(ref url) = whitelist_api_url {
            log::info!("📋 Whitelist backend URL: {}", url);
        }

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    log::warn!("⚠️  Invalid REQUEST_TIMEOUT_SECS '{}', using default", raw);
                    None
                }
            })
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            target_chain,
            provider_rpc_url,
            whitelist_api_url,
            data_dir,
            request_timeout_secs,
        }
    }
}

impl Default for SessionConfig {
    /// Default configuration (BNB Smart Chain mainnet)
    fn default() -> Self {
        Self {
            target_chain: ChainDescriptor::bsc(),
            provider_rpc_url: None,
            whitelist_api_url: None,
            data_dir: PathBuf::from("./data"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

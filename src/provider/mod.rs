//! Chain provider capability
//!
//! The session talks to a wallet provider through this narrow seam: a
//! JSON-RPC style `request` call plus push events for account and chain
//! changes.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ProviderError;

mod mock;
mod rpc;

pub use mock::MockProvider;
pub use rpc::HttpProvider;

/// RPC methods used by the session.
pub mod methods {
    pub const ETH_ACCOUNTS: &str = "eth_accounts";
    pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ETH_CHAIN_ID: &str = "eth_chainId";
    pub const WALLET_SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const WALLET_ADD_CHAIN: &str = "wallet_addEthereumChain";
}

/// Provider error codes (EIP-1193 / EIP-3085 conventions).
pub mod codes {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// JSON-RPC method not found.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Transport-level failure, not a wallet response.
    pub const TRANSPORT: i64 = -32000;
}

/// Push events emitted by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
}

pub type EventSender = mpsc::UnboundedSender<ProviderEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ProviderEvent>;

#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Submit a single RPC request to the wallet provider.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Register an event sink for `accountsChanged`/`chainChanged`.
    ///
    /// The returned guard unregisters the sink when dropped. Transports
    /// without push support return a no-op subscription.
    fn subscribe(&self, sink: EventSender) -> EventSubscription;
}

/// RAII guard for a provider event subscription.
pub struct EventSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl EventSubscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription for transports without push events.
    pub fn none() -> Self {
        Self { unsubscribe: None }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

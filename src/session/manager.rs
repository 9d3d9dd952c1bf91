use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::chain::normalize_chain_id;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::provider::{
    codes, methods, ChainProvider, EventSubscription, ProviderEvent,
};
use crate::session::state::{ConnectionState, DisconnectNotice, SessionStatus, SwitchOutcome};
use crate::storage::Storage;
use crate::whitelist::{WhitelistApiClient, WhitelistRegistrar};

/// There is no standardized revoke call in provider APIs, so a local
/// disconnect cannot remove the wallet-side permission grant.
const DISCONNECT_NOTICE: &str = "Disconnected from this app. Your wallet still lists this site as \
     authorized; remove it from the wallet's connected-sites settings to revoke access.";

/// Session Manager - Orchestration Layer
///
/// Mediates between a single wallet provider and the rest of the
/// application, producing a stable connection state. Constructed once and
/// shared by reference; never a module-level singleton.
pub struct WalletSession {
    provider: Option<Arc<dyn ChainProvider>>,
    storage: Storage,
    config: SessionConfig,
    whitelist: WhitelistRegistrar,
    api_client: Option<WhitelistApiClient>,
    state: Mutex<ConnectionState>,
    /// Fail-fast gate: overlapping connect/switch calls are rejected, not
    /// queued.
    op_in_flight: AtomicBool,
    /// Bumped by disconnect and chain-change resets. An operation that
    /// resumes under a newer generation abandons without touching state.
    generation: AtomicU64,
    /// Keeps the provider event subscription alive for the session lifetime.
    subscription: Mutex<Option<EventSubscription>>,
    /// Handed to the event pump so the task cannot keep the session alive.
    self_weak: Weak<WalletSession>,
}

impl WalletSession {
    pub fn new(
        provider: Option<Arc<dyn ChainProvider>>,
        storage: Storage,
        config: SessionConfig,
    ) -> Arc<Self> {
        let api_client = config
            .whitelist_api_url
            .as_deref()
            .map(WhitelistApiClient::new);
        let whitelist = WhitelistRegistrar::new(storage.clone());

        Arc::new_cyclic(|weak| Self {
            provider,
            storage,
            config,
            whitelist,
            api_client,
            state: Mutex::new(ConnectionState::default()),
            op_in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            subscription: Mutex::new(None),
            self_weak: weak.clone(),
        })
    }

    // ============================================================================
    // Startup
    // ============================================================================

    /// Restore session state on startup and wire provider events.
    ///
    /// A persisted disconnect flag suppresses the account query entirely: an
    /// authorized account in the provider is not enough to re-establish a
    /// session the user explicitly left.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        if self.provider.is_none() {
            log::warn!("No wallet provider configured; session starts disconnected");
            return Ok(());
        }

        if self.storage.disconnect_flag() {
            log::info!("Disconnect flag set; skipping auto-reconnect");
        } else {
            self.try_restore().await;
        }

        self.attach_events();
        Ok(())
    }

    /// Query already-authorized accounts and adopt the first one, if any.
    /// Failures here leave the session disconnected rather than erroring out
    /// of startup.
    async fn try_restore(&self) {
        let accounts = match self.request(methods::ETH_ACCOUNTS, Value::Null).await {
            Ok(value) => parse_accounts(&value),
            Err(e) => {
                log::warn!("Account restore failed: {}", e);
                return;
            }
        };

        let Some(first) = accounts.first() else {
            log::debug!("No authorized accounts; starting disconnected");
            return;
        };
        let address = first.to_lowercase();

        let chain_id = match self.request(methods::ETH_CHAIN_ID, Value::Null).await {
            Ok(value) => normalize_chain_id(value.as_str().unwrap_or_default()),
            Err(e) => {
                log::warn!("Chain id query failed: {}", e);
                String::new()
            }
        };

        log::info!("Restored session for {} on chain {}", address, chain_id);
        let mut state = self.state.lock().unwrap();
        state.is_connected = true;
        state.address = address;
        state.chain_id = chain_id;
    }

    /// Subscribe to provider push events for the rest of the session.
    ///
    /// The pump holds only a weak handle so a dropped session tears the task
    /// down instead of keeping itself alive through it.
    fn attach_events(&self) {
        let Some(provider) = self.provider.as_ref() else {
            return;
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let guard = provider.subscribe(tx);
        *self.subscription.lock().unwrap() = Some(guard);

        let weak = self.self_weak.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(session) = weak.upgrade() else { break };
                match event {
                    ProviderEvent::AccountsChanged(accounts) => {
                        session.handle_accounts_changed(accounts);
                    }
                    ProviderEvent::ChainChanged(chain_id) => {
                        session.handle_chain_changed(&chain_id).await;
                    }
                }
            }
            log::debug!("Provider event pump stopped");
        });
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Interactive connect: request account access, adopt the first account,
    /// clear any prior disconnect intent, whitelist the address, and
    /// negotiate the target network when needed.
    pub async fn connect(&self) -> Result<SessionStatus, SessionError> {
        if self.provider.is_none() {
            return Err(SessionError::ProviderUnavailable);
        }
        let _gate = self.begin_operation()?;
        let generation = self.generation.load(Ordering::SeqCst);

        self.state.lock().unwrap().is_connecting = true;
        let result = self.do_connect(generation).await;
        // Finally-equivalent: the flag resets whether the handshake
        // succeeded or not.
        self.state.lock().unwrap().is_connecting = false;

        result?;
        Ok(self.status())
    }

    async fn do_connect(&self, generation: u64) -> Result<(), SessionError> {
        let value = self
            .request(methods::ETH_REQUEST_ACCOUNTS, Value::Null)
            .await?;
        let accounts = parse_accounts(&value);
        let Some(first) = accounts.first() else {
            return Err(SessionError::NoAccounts);
        };
        let address = first.to_lowercase();

        let chain_value = self.request(methods::ETH_CHAIN_ID, Value::Null).await?;
        let chain_id = normalize_chain_id(chain_value.as_str().unwrap_or_default());

        if self.generation.load(Ordering::SeqCst) != generation {
            log::warn!(
                "Connect for {} resolved after a session reset; discarding",
                address
            );
            return Err(SessionError::Superseded);
        }

        // Reconnecting is an explicit act of trust; it overrides any prior
        // disconnect.
        self.storage.clear_disconnect_flag()?;

        {
            let mut state = self.state.lock().unwrap();
            state.is_connected = true;
            state.address = address.clone();
            state.chain_id = chain_id.clone();
            state.is_selector_open = false;
        }
        log::info!("Connected {} on chain {}", address, chain_id);

        self.register_whitelisted(&address, None);

        if !self.config.target_chain.matches(&chain_id) {
            log::info!(
                "Connected on {} but target is {}; negotiating switch",
                chain_id,
                self.config.target_chain.chain_id
            );
            // The connection above stays committed even when this fails; the
            // caller sees the switch error with the session on the wrong
            // network.
            self.switch_network_inner().await?;
        }

        Ok(())
    }

    /// Tear down the session and remember the user's intent.
    ///
    /// The flag is persisted before in-memory state is cleared so an
    /// interruption between the two steps still leaves suppression in place.
    pub fn disconnect(&self) -> Result<DisconnectNotice, SessionError> {
        self.storage.set_disconnect_flag()?;
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.state.lock().unwrap().clear();

        // Leaving wipes the whole local whitelist cache, not just the
        // current address.
        if let Err(e) = self.whitelist.clear() {
            log::warn!("Failed to clear whitelist cache: {}", e);
        }

        log::info!("Session disconnected");
        Ok(DisconnectNotice {
            notice: DISCONNECT_NOTICE.to_string(),
        })
    }

    /// Negotiate the target network with the wallet.
    pub async fn switch_network(&self) -> Result<SwitchOutcome, SessionError> {
        if self.provider.is_none() {
            return Err(SessionError::ProviderUnavailable);
        }
        let _gate = self.begin_operation()?;
        self.switch_network_inner().await
    }

    /// Two-step negotiation: ask for a switch, and when the wallet does not
    /// know the chain (code 4902) fall back to adding the full descriptor.
    /// The outcomes stay distinct so callers can message "needs adding"
    /// apart from a plain refusal.
    async fn switch_network_inner(&self) -> Result<SwitchOutcome, SessionError> {
        let target = &self.config.target_chain;
        let params = json!([{ "chainId": target.chain_id }]);

        let outcome = match self.request(methods::WALLET_SWITCH_CHAIN, params).await {
            Ok(_) => SwitchOutcome::Switched,
            Err(SessionError::Provider(e)) if e.code == codes::UNRECOGNIZED_CHAIN => {
                log::info!("Wallet does not know chain {}; adding it", target.chain_id);
                self.request(methods::WALLET_ADD_CHAIN, json!([target]))
                    .await
                    .map_err(|e| match e {
                        SessionError::Provider(inner) => SessionError::ChainAddFailed(inner),
                        other => other,
                    })?;
                SwitchOutcome::Added
            }
            Err(SessionError::Provider(e)) if e.code == codes::USER_REJECTED => {
                return Err(SessionError::ChainSwitchRejected(e));
            }
            Err(other) => return Err(other),
        };

        let mut state = self.state.lock().unwrap();
        state.chain_id = normalize_chain_id(&target.chain_id);
        log::info!("Now on target chain {}", state.chain_id);
        Ok(outcome)
    }

    /// Wallet-selection modal visibility; connect closes it as a side
    /// effect.
    pub fn set_selector_open(&self, open: bool) {
        self.state.lock().unwrap().is_selector_open = open;
    }

    /// Cloned snapshot plus the derived network check.
    pub fn status(&self) -> SessionStatus {
        let state = self.state.lock().unwrap().clone();
        let is_correct_network = self.config.target_chain.matches(&state.chain_id);
        SessionStatus {
            state,
            is_correct_network,
            target_chain_id: self.config.target_chain.chain_id.clone(),
        }
    }

    pub fn whitelist(&self) -> &WhitelistRegistrar {
        &self.whitelist
    }

    // ============================================================================
    // Provider-driven event handlers
    // ============================================================================

    /// An emptied account list usually means the user disconnected from the
    /// wallet's own UI, so it takes the same path as an explicit disconnect,
    /// suppression flag included. A new account is a trust signal symmetric
    /// with connect and clears the flag.
    pub fn handle_accounts_changed(&self, accounts: Vec<String>) {
        match accounts.first() {
            None => {
                log::info!("Provider reported no accounts; treating as disconnect");
                if let Err(e) = self.disconnect() {
                    log::error!("Disconnect on empty account list failed: {}", e);
                }
            }
            Some(first) => {
                let address = first.to_lowercase();
                log::info!("Active account changed to {}", address);
                if let Err(e) = self.storage.clear_disconnect_flag() {
                    log::warn!("Failed to clear disconnect flag: {}", e);
                }
                let mut state = self.state.lock().unwrap();
                state.address = address;
                state.is_connected = true;
            }
        }
    }

    /// Chain switches reset the whole session rather than reconciling
    /// consumer-visible state in place: everything volatile is rebuilt from
    /// the provider.
    pub async fn handle_chain_changed(&self, chain_id: &str) {
        log::info!("Chain changed to {}; resetting session state", chain_id);
        self.generation.fetch_add(1, Ordering::SeqCst);

        {
            let mut state = self.state.lock().unwrap();
            state.clear();
            state.chain_id = normalize_chain_id(chain_id);
        }

        if !self.storage.disconnect_flag() {
            self.try_restore().await;
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn begin_operation(&self) -> Result<OpGuard<'_>, SessionError> {
        if self
            .op_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::OperationInProgress);
        }
        Ok(OpGuard {
            flag: &self.op_in_flight,
        })
    }

    /// Provider call with the configured per-request deadline. A wallet
    /// prompt the user never answers fails here instead of hanging the
    /// session.
    async fn request(&self, method: &str, params: Value) -> Result<Value, SessionError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(SessionError::ProviderUnavailable)?;
        let deadline = Duration::from_secs(self.config.request_timeout_secs);

        match tokio::time::timeout(deadline, provider.request(method, params)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                log::warn!("Provider request {} timed out", method);
                Err(SessionError::RequestTimeout(
                    self.config.request_timeout_secs,
                ))
            }
        }
    }

    /// Whitelist membership is a non-critical side effect of connecting:
    /// local cache always, backend POST in the background. Neither failure
    /// blocks the connect.
    fn register_whitelisted(&self, address: &str, tx_hash: Option<String>) {
        match self.whitelist.register(address, tx_hash.clone()) {
            Ok(true) => log::info!("Whitelisted {}", address),
            Ok(false) => log::debug!("{} already whitelisted", address),
            Err(e) => log::warn!("Local whitelist write failed: {}", e),
        }

        if let Some(client) = self.api_client.clone() {
            let address = address.to_string();
            tokio::spawn(async move {
                if let Err(e) = client.register(&address, tx_hash.as_deref()).await {
                    log::warn!("Whitelist backend registration failed: {}", e);
                }
            });
        }
    }
}

/// Releases the operation gate when the operation settles.
struct OpGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn parse_accounts(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

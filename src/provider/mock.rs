/// Scriptable in-memory provider for tests and local development.
///
/// State is fully scripted: accounts, current chain, the set of chains the
/// wallet knows, one-shot error injection per method, and per-method response
/// delays. Every request is recorded so tests can assert on exactly which
/// calls the session issued.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{codes, methods, ChainProvider, EventSender, EventSubscription, ProviderEvent};
use crate::error::ProviderError;

#[derive(Default)]
struct MockState {
    accounts: Vec<String>,
    chain_id: String,
    known_chains: Vec<String>,
    fail_next: HashMap<String, ProviderError>,
    delays_ms: HashMap<String, u64>,
    calls: Vec<(String, Value)>,
    sinks: Vec<(u64, EventSender)>,
}

pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
    next_sink_id: AtomicU64,
}

impl MockProvider {
    pub fn new() -> Self {
        let state = MockState {
            chain_id: "0x1".to_string(),
            known_chains: vec!["0x1".to_string()],
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            next_sink_id: AtomicU64::new(0),
        }
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    /// Set the wallet's current chain; the chain becomes known to the wallet.
    pub fn set_chain_id(&self, chain_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.chain_id = chain_id.to_string();
        if !state.known_chains.iter().any(|c| c == chain_id) {
            state.known_chains.push(chain_id.to_string());
        }
    }

    pub fn add_known_chain(&self, chain_id: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.known_chains.iter().any(|c| c == chain_id) {
            state.known_chains.push(chain_id.to_string());
        }
    }

    /// Make the next call of `method` fail with the given error.
    pub fn fail_next(&self, method: &str, error: ProviderError) {
        self.state
            .lock()
            .unwrap()
            .fail_next
            .insert(method.to_string(), error);
    }

    /// Delay every response of `method` (simulates a slow wallet prompt).
    pub fn set_delay_ms(&self, method: &str, delay_ms: u64) {
        self.state
            .lock()
            .unwrap()
            .delays_ms
            .insert(method.to_string(), delay_ms);
    }

    /// All recorded requests, in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// How many times `method` was requested.
    pub fn calls_for(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// Push an `accountsChanged` event to all subscribed sinks.
    pub fn emit_accounts_changed(&self, accounts: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.accounts = accounts.clone();
        state
            .sinks
            .retain(|(_, sink)| sink.send(ProviderEvent::AccountsChanged(accounts.clone())).is_ok());
    }

    /// Push a `chainChanged` event to all subscribed sinks.
    pub fn emit_chain_changed(&self, chain_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.chain_id = chain_id.to_string();
        state
            .sinks
            .retain(|(_, sink)| sink.send(ProviderEvent::ChainChanged(chain_id.to_string())).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().sinks.len()
    }

    /// Everything that must happen under the lock; the async wrapper only
    /// sleeps afterwards.
    fn respond(&self, method: &str, params: Value) -> (Result<Value, ProviderError>, u64) {
        let mut state = self.state.lock().unwrap();
        state.calls.push((method.to_string(), params.clone()));
        let delay_ms = state.delays_ms.get(method).copied().unwrap_or(0);

        if let Some(error) = state.fail_next.remove(method) {
            return (Err(error), delay_ms);
        }

        let result = match method {
            methods::ETH_ACCOUNTS | methods::ETH_REQUEST_ACCOUNTS => Ok(json!(state.accounts)),
            methods::ETH_CHAIN_ID => Ok(json!(state.chain_id)),
            methods::WALLET_SWITCH_CHAIN => match chain_id_param(&params) {
                Some(chain_id) => {
                    if state.known_chains.iter().any(|c| c == &chain_id) {
                        state.chain_id = chain_id;
                        Ok(Value::Null)
                    } else {
                        Err(ProviderError::new(
                            codes::UNRECOGNIZED_CHAIN,
                            format!("Unrecognized chain ID \"{}\"", chain_id),
                        ))
                    }
                }
                None => Err(ProviderError::new(-32602, "missing chainId param")),
            },
            methods::WALLET_ADD_CHAIN => match chain_id_param(&params) {
                Some(chain_id) => {
                    if !state.known_chains.iter().any(|c| c == &chain_id) {
                        state.known_chains.push(chain_id.clone());
                    }
                    // Adding a chain also switches to it, like real wallets do.
                    state.chain_id = chain_id;
                    Ok(Value::Null)
                }
                None => Err(ProviderError::new(-32602, "missing chainId param")),
            },
            other => Err(ProviderError::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        };

        (result, delay_ms)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Both switch and add take a one-element array whose object carries
/// `chainId`.
fn chain_id_param(params: &Value) -> Option<String> {
    params
        .get(0)
        .and_then(|p| p.get("chainId"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl ChainProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let (result, delay_ms) = self.respond(method, params);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        result
    }

    fn subscribe(&self, sink: EventSender) -> EventSubscription {
        let id = self.next_sink_id.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().sinks.push((id, sink));

        let state = Arc::clone(&self.state);
        EventSubscription::new(move || {
            state.lock().unwrap().sinks.retain(|(sid, _)| *sid != id);
        })
    }
}

/// Scriptable wallet state behind the JSON-RPC surface
use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::types::RpcError;

/// The requested chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Default)]
struct WalletState {
    accounts: Vec<String>,
    chain_id: String,
    known_chains: Vec<String>,
    fail_next: HashMap<String, RpcError>,
}

pub struct MockWallet {
    state: Mutex<WalletState>,
}

impl MockWallet {
    pub fn new(chain_id: &str) -> Self {
        Self {
            state: Mutex::new(WalletState {
                chain_id: chain_id.to_string(),
                known_chains: vec![chain_id.to_string()],
                ..Default::default()
            }),
        }
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    pub fn set_chain(&self, chain_id: &str, known_chains: Option<Vec<String>>) {
        let mut state = self.state.lock().unwrap();
        state.chain_id = chain_id.to_string();
        if let Some(known) = known_chains {
            state.known_chains = known;
        }
        if !state.known_chains.iter().any(|c| c == chain_id) {
            state.known_chains.push(chain_id.to_string());
        }
    }

    /// Make the next call of `method` fail with the given error.
    pub fn inject_failure(&self, method: &str, error: RpcError) {
        self.state
            .lock()
            .unwrap()
            .fail_next
            .insert(method.to_string(), error);
    }

    pub fn snapshot(&self) -> (Vec<String>, String, Vec<String>) {
        let state = self.state.lock().unwrap();
        (
            state.accounts.clone(),
            state.chain_id.clone(),
            state.known_chains.clone(),
        )
    }

    /// Answer a provider RPC request against the scripted state.
    pub fn handle(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        let mut state = self.state.lock().unwrap();

        if let Some(error) = state.fail_next.remove(method) {
            return Err(error);
        }

        match method {
            "eth_accounts" | "eth_requestAccounts" => Ok(json!(state.accounts)),
            "eth_chainId" => Ok(json!(state.chain_id)),
            "wallet_switchEthereumChain" => {
                let chain_id = chain_id_param(params)
                    .ok_or_else(|| RpcError::new(INVALID_PARAMS, "missing chainId param"))?;
                if state.known_chains.iter().any(|c| c == &chain_id) {
                    state.chain_id = chain_id;
                    Ok(Value::Null)
                } else {
                    Err(RpcError::new(
                        UNRECOGNIZED_CHAIN,
                        format!("Unrecognized chain ID \"{}\"", chain_id),
                    ))
                }
            }
            "wallet_addEthereumChain" => {
                let chain_id = chain_id_param(params)
                    .ok_or_else(|| RpcError::new(INVALID_PARAMS, "missing chainId param"))?;
                if !state.known_chains.iter().any(|c| c == &chain_id) {
                    state.known_chains.push(chain_id.clone());
                }
                // Adding a chain also switches to it, like real wallets do.
                state.chain_id = chain_id;
                Ok(Value::Null)
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_unknown_chain_is_4902() {
        let wallet = MockWallet::new("0x1");
        let err = wallet
            .handle("wallet_switchEthereumChain", &json!([{ "chainId": "0x38" }]))
            .unwrap_err();
        assert_eq!(err.code, UNRECOGNIZED_CHAIN);
    }

    #[test]
    fn test_add_then_switch() {
        let wallet = MockWallet::new("0x1");
        wallet
            .handle("wallet_addEthereumChain", &json!([{ "chainId": "0x38" }]))
            .unwrap();
        assert_eq!(wallet.handle("eth_chainId", &Value::Null).unwrap(), json!("0x38"));

        wallet
            .handle("wallet_switchEthereumChain", &json!([{ "chainId": "0x38" }]))
            .unwrap();
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let wallet = MockWallet::new("0x1");
        wallet.inject_failure("eth_accounts", RpcError::new(4001, "nope"));

        assert_eq!(wallet.handle("eth_accounts", &Value::Null).unwrap_err().code, 4001);
        assert!(wallet.handle("eth_accounts", &Value::Null).is_ok());
    }

    #[test]
    fn test_unknown_method() {
        let wallet = MockWallet::new("0x1");
        let err = wallet.handle("eth_sendTransaction", &Value::Null).unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
    }
}

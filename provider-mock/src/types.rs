/// JSON-RPC envelope and control types for the mock wallet provider
///
/// The RPC shapes match what an injected browser provider would answer, so
/// clients can consume them transparently.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

// ============================================================================
// Control endpoint types (not part of the provider surface)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetAccountsRequest {
    pub accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetChainRequest {
    pub chain_id: String,
    /// Replace the wallet's known-chain set; the current chain is always
    /// included.
    #[serde(default)]
    pub known_chains: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct InjectFailureRequest {
    pub method: String,
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub accounts: Vec<String>,
    pub chain_id: String,
    pub known_chains: Vec<String>,
}

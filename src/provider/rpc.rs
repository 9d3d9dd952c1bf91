/// JSON-RPC 2.0 provider bridge
///
/// Forwards session requests to a remote wallet-provider endpoint over HTTP.
/// Wallet error objects come back in the JSON-RPC `error` member and are
/// surfaced with their original codes; transport failures get a synthetic
/// code so callers can tell them apart.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{codes, ChainProvider, EventSender, EventSubscription};
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct HttpProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChainProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params,
        };

        log::debug!("Provider request: {}", method);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::new(codes::TRANSPORT, format!("request failed: {}", e)))?;

        let body: RpcResponse = response.json().await.map_err(|e| {
            ProviderError::new(codes::TRANSPORT, format!("invalid response: {}", e))
        })?;

        if let Some(error) = body.error {
            log::debug!("Provider rejected {}: code {}", method, error.code);
            return Err(ProviderError::new(error.code, error.message));
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    fn subscribe(&self, _sink: EventSender) -> EventSubscription {
        // HTTP transport has no push events.
        EventSubscription::none()
    }
}

/// Axum HTTP handlers for the mock provider endpoints
use axum::{extract::State, Json};
use std::sync::Arc;

use crate::state::MockWallet;
use crate::types::{
    InjectFailureRequest, RpcError, RpcRequest, RpcResponse, SetAccountsRequest, SetChainRequest,
    StateResponse,
};

/// Shared application state
pub type AppState = Arc<MockWallet>;

/// GET /health
pub async fn health_check() -> &'static str {
    "ok"
}

/// POST /
/// The provider JSON-RPC endpoint
pub async fn rpc_handler(
    State(wallet): State<AppState>,
    Json(req): Json<RpcRequest>,
) -> Json<RpcResponse> {
    log::debug!("RPC request: {}", req.method);

    match wallet.handle(&req.method, &req.params) {
        Ok(result) => Json(RpcResponse::success(req.id, result)),
        Err(error) => {
            log::debug!("RPC {} rejected: code {}", req.method, error.code);
            Json(RpcResponse::failure(req.id, error))
        }
    }
}

/// GET /control/state
pub async fn get_state(State(wallet): State<AppState>) -> Json<StateResponse> {
    let (accounts, chain_id, known_chains) = wallet.snapshot();
    Json(StateResponse {
        accounts,
        chain_id,
        known_chains,
    })
}

/// POST /control/accounts
pub async fn set_accounts(
    State(wallet): State<AppState>,
    Json(req): Json<SetAccountsRequest>,
) -> Json<StateResponse> {
    wallet.set_accounts(req.accounts);
    get_state(State(wallet)).await
}

/// POST /control/chain
pub async fn set_chain(
    State(wallet): State<AppState>,
    Json(req): Json<SetChainRequest>,
) -> Json<StateResponse> {
    wallet.set_chain(&req.chain_id, req.known_chains);
    get_state(State(wallet)).await
}

/// POST /control/fail
/// Inject an error for the next call of a method
pub async fn inject_failure(
    State(wallet): State<AppState>,
    Json(req): Json<InjectFailureRequest>,
) -> Json<StateResponse> {
    wallet.inject_failure(&req.method, RpcError::new(req.code, req.message));
    get_state(State(wallet)).await
}

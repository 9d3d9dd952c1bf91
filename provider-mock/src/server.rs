/// Axum HTTP server setup and routing
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::MockWallet;

pub fn create_router(wallet: Arc<MockWallet>) -> Router {
    // Allow requests from the session daemon and tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Provider JSON-RPC endpoint
        .route("/", post(rpc_handler))
        // Scripting endpoints
        .route("/control/state", get(get_state))
        .route("/control/accounts", post(set_accounts))
        .route("/control/chain", post(set_chain))
        .route("/control/fail", post(inject_failure))
        // Shared state
        .with_state(wallet)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(wallet: Arc<MockWallet>, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(wallet);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Provider mock server listening on http://{}", addr);
    log::info!("🔧 Scripting endpoints: POST /control/{{accounts,chain,fail}}");

    axum::serve(listener, app).await?;

    Ok(())
}

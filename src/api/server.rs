use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::session::WalletSession;

pub fn create_router(session: Arc<WalletSession>) -> Router {
    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://your-app.vercel.app" for production;
    // unset allows any origin (development mode).
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        // Session routes
        .route("/api/session", get(handlers::session_status_handler))
        .route("/api/session/connect", post(handlers::connect_handler))
        .route(
            "/api/session/disconnect",
            post(handlers::disconnect_handler),
        )
        .route(
            "/api/session/switch-network",
            post(handlers::switch_network_handler),
        )
        .route("/api/session/selector", post(handlers::selector_handler))
        // Whitelist routes
        .route(
            "/api/whitelist",
            get(handlers::list_whitelist_handler).post(handlers::register_whitelist_handler),
        )
        .route(
            "/api/whitelist/:address",
            get(handlers::whitelist_membership_handler),
        )
        .layer(cors)
        .with_state(session)
}

pub async fn start_server(session: Arc<WalletSession>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(session);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Session API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::SessionError;
use crate::session::{SessionStatus, WalletSession};
use crate::storage::WhitelistEntry;
use crate::whitelist::is_hex_address;

use super::types::{
    DisconnectResponse, RegisterWhitelistRequest, RegisterWhitelistResponse, SelectorRequest,
    SwitchNetworkResponse, WhitelistMembership,
};

pub async fn session_status_handler(
    State(session): State<Arc<WalletSession>>,
) -> Json<SessionStatus> {
    Json(session.status())
}

pub async fn connect_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<SessionStatus>, SessionError> {
    let status = session.connect().await?;
    Ok(Json(status))
}

pub async fn disconnect_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<DisconnectResponse>, SessionError> {
    let notice = session.disconnect()?;

    Ok(Json(DisconnectResponse {
        status: "disconnected".to_string(),
        notice: notice.notice,
    }))
}

pub async fn switch_network_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<SwitchNetworkResponse>, SessionError> {
    let outcome = session.switch_network().await?;
    Ok(Json(SwitchNetworkResponse { outcome }))
}

pub async fn selector_handler(
    State(session): State<Arc<WalletSession>>,
    Json(req): Json<SelectorRequest>,
) -> Json<SessionStatus> {
    session.set_selector_open(req.open);
    Json(session.status())
}

pub async fn list_whitelist_handler(
    State(session): State<Arc<WalletSession>>,
) -> Result<Json<Vec<WhitelistEntry>>, SessionError> {
    let entries = session.whitelist().entries()?;
    Ok(Json(entries))
}

pub async fn whitelist_membership_handler(
    State(session): State<Arc<WalletSession>>,
    Path(address): Path<String>,
) -> Result<Json<WhitelistMembership>, SessionError> {
    let address = address.to_lowercase();
    let registered = session.whitelist().is_registered(&address)?;
    Ok(Json(WhitelistMembership {
        address,
        registered,
    }))
}

pub async fn register_whitelist_handler(
    State(session): State<Arc<WalletSession>>,
    Json(req): Json<RegisterWhitelistRequest>,
) -> Result<Json<RegisterWhitelistResponse>, SessionError> {
    if !is_hex_address(&req.address) {
        return Err(SessionError::InvalidInput(format!(
            "not a hex address: {}",
            req.address
        )));
    }

    let address = req.address.to_lowercase();
    let inserted = session.whitelist().register(&address, req.tx_hash)?;
    let total = session.whitelist().entries()?.len();

    Ok(Json(RegisterWhitelistResponse { inserted, total }))
}

use serde::{Deserialize, Serialize};

use crate::session::SwitchOutcome;

#[derive(Debug, Deserialize)]
pub struct SelectorRequest {
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterWhitelistRequest {
    pub address: String,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterWhitelistResponse {
    pub inserted: bool,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct WhitelistMembership {
    pub address: String,
    pub registered: bool,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub status: String,
    pub notice: String,
}

#[derive(Debug, Serialize)]
pub struct SwitchNetworkResponse {
    pub outcome: SwitchOutcome,
}

//! Data models for persisted session data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One whitelist record per address. Append-only: entries are never mutated
/// or deleted individually, only wiped wholesale on disconnect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub address: String,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub status: WhitelistStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistStatus {
    Pending,
    Confirmed,
}

impl WhitelistEntry {
    pub fn new(address: impl Into<String>, tx_hash: Option<String>) -> Self {
        let status = if tx_hash.is_some() {
            WhitelistStatus::Confirmed
        } else {
            WhitelistStatus::Pending
        };
        Self {
            address: address.into(),
            joined_at: Utc::now(),
            tx_hash,
            status,
        }
    }
}

//! Session connection state

use serde::{Deserialize, Serialize};

/// Volatile connection state, created fresh on every start. Only the
/// disconnect-intent flag outlives the process (see `Storage`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub is_connected: bool,
    /// Active account, lowercase hex when present; empty otherwise.
    pub address: String,
    /// Hex chain id as reported by the provider, normalized lowercase.
    pub chain_id: String,
    /// True only while the connect handshake is in flight.
    pub is_connecting: bool,
    /// Wallet-selection modal visibility.
    pub is_selector_open: bool,
}

impl ConnectionState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Snapshot returned to callers. `is_correct_network` is derived from the
/// chain id and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub state: ConnectionState,
    pub is_correct_network: bool,
    pub target_chain_id: String,
}

/// How a network-switch negotiation concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchOutcome {
    /// The wallet switched directly.
    Switched,
    /// The wallet did not know the chain; it was added and adopted.
    Added,
}

/// Returned by disconnect so callers can explain what the operation did
/// NOT do: the wallet itself still lists the site as authorized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectNotice {
    pub notice: String,
}

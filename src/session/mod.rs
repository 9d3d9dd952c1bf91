//! Wallet session lifecycle
//!
//! - Connection state and status snapshots
//! - Session orchestration (connect, disconnect, network negotiation)

mod manager;
mod state;

pub use manager::WalletSession;
pub use state::{ConnectionState, DisconnectNotice, SessionStatus, SwitchOutcome};

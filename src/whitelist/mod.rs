//! Whitelist registration
//!
//! - Locally cached record of addresses that joined
//! - Best-effort client for the remote registration endpoint

mod api_client;
mod registrar;

pub use api_client::WhitelistApiClient;
pub use registrar::{is_hex_address, WhitelistRegistrar};

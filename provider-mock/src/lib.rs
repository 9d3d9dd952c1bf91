/// Provider Mock Server Library
///
/// This crate provides both a standalone binary and library components for
/// mocking a wallet provider's JSON-RPC surface with scriptable state.
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server};
pub use state::MockWallet;
pub use types::{RpcError, RpcRequest, RpcResponse};

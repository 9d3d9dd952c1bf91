//! HTTP surface for the session service

pub mod handlers;
pub mod server;
pub mod types;

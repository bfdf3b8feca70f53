//! HTTP adapter for wallet pass endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::wallet_routes;

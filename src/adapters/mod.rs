//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Card, analytics and subscription storage (sqlx)
//! - `memory` - In-memory storage for tests and local runs
//! - `stripe` - Payment provider (checkout, portal, webhooks)
//! - `auth` - Supabase access token validation
//! - `wallet` - Apple pass signing and assets, Google Wallet JWTs
//! - `http` - axum REST API

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
pub mod wallet;

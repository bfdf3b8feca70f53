//! HTTP adapter for subscription endpoints.
//!
//! - `GET /api/subscription` - Current plan, limits and usage
//! - `POST /api/create-checkout-session` - Start a paid checkout
//! - `POST /api/create-portal-session` - Open the billing portal
//! - `POST /api/stripe/webhook` - Handle Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{subscription_routes, webhook_routes};

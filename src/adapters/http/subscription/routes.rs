//! Axum routes for subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    create_checkout_session, create_portal_session, get_subscription, handle_stripe_webhook,
};

/// Subscription routes that require a signed-in user.
///
/// - `GET /api/subscription` - Current plan and usage
/// - `POST /api/create-checkout-session` - Start a checkout
/// - `POST /api/create-portal-session` - Open the billing portal
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/api/subscription", get(get_subscription))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/create-portal-session", post(create_portal_session))
}

/// Webhook routes. No user authentication; events are verified by signature.
///
/// - `POST /api/stripe/webhook` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/api/stripe/webhook", post(handle_stripe_webhook))
}

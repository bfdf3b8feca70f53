//! Axum routes for wallet pass endpoints.

use axum::{routing::post, Router};

use super::super::state::AppState;
use super::handlers::{apple_pass, google_pass};

/// Wallet routes; all require a signed-in user on a plan with passes.
///
/// - `POST /api/passes/apple` - Download a `.pkpass`
/// - `POST /api/passes/google` - Get a Google Wallet save link
pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/passes/apple", post(apple_pass))
        .route("/api/passes/google", post(google_pass))
}

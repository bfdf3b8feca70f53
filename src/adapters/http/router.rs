//! Top-level axum router.
//!
//! Public routes (health, public card pages, tracking, webhooks) and
//! authenticated routes are built separately; the auth middleware is a
//! route layer on the authenticated half only.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::analytics::{analytics_routes, tracking_routes};
use super::cards::{card_routes, public_card_routes};
use super::error::ErrorResponse;
use super::middleware::auth_middleware;
use super::state::AppState;
use super::subscription::{subscription_routes, webhook_routes};
use super::wallet::wallet_routes;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Liveness probe
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("NOT_FOUND", "Route not found")),
    )
}

/// Builds the application router with tracing, timeout and CORS layers.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    let authenticated = Router::new()
        .merge(card_routes())
        .merge(analytics_routes())
        .merge(subscription_routes())
        .merge(wallet_routes())
        .route_layer(middleware::from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(health))
        .merge(public_card_routes())
        .merge(tracking_routes())
        .merge(webhook_routes());

    Router::new()
        .merge(public)
        .merge(authenticated)
        .fallback(not_found)
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

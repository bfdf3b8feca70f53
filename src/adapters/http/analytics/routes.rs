//! Axum routes for analytics endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{card_analytics, dashboard_analytics, track_event};

/// Analytics routes that require a signed-in user.
///
/// - `GET /api/analytics` - Dashboard summary
/// - `GET /api/analytics/:card_id` - Summary for one card
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", get(dashboard_analytics))
        .route("/api/analytics/:card_id", get(card_analytics))
}

/// Event tracking, called from public card pages.
///
/// - `POST /api/analytics/track` - Record an event
pub fn tracking_routes() -> Router<AppState> {
    Router::new().route("/api/analytics/track", post(track_event))
}

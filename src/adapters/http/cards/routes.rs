//! Axum routes for card endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    create_card, delete_card, export_vcard, get_card, get_public_card, list_cards, list_templates,
    save_card,
};

/// Card routes that require a signed-in user.
///
/// - `POST /api/cards` - Create a card
/// - `POST /api/cards/save` - Create or update from the editor
/// - `GET /api/cards` - List the user's cards
/// - `GET /api/cards/:id` - Read an owned card
/// - `DELETE /api/cards/:id` - Delete an owned card
pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cards", get(list_cards).post(create_card))
        .route("/api/cards/save", post(save_card))
        .route("/api/cards/:id", get(get_card).delete(delete_card))
}

/// Card routes open to anonymous visitors.
///
/// - `GET /api/cards/templates` - Template cards
/// - `GET /api/public/cards/:id` - Public card data
/// - `GET /api/public/cards/:id/vcard` - vCard download
pub fn public_card_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cards/templates", get(list_templates))
        .route("/api/public/cards/:id", get(get_public_card))
        .route("/api/public/cards/:id/vcard", get(export_vcard))
}

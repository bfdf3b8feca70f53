//! HTTP adapter for card endpoints.
//!
//! - `POST /api/cards`, `POST /api/cards/save` - Create and save cards
//! - `GET /api/cards`, `GET|DELETE /api/cards/:id` - Owner reads and deletes
//! - `GET /api/cards/templates` - Template listing
//! - `GET /api/public/cards/:id[/vcard]` - Public page data and vCard export

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{card_routes, public_card_routes};

//! HTTP adapter for analytics endpoints.
//!
//! - `POST /api/analytics/track` - Record events from public card pages
//! - `GET /api/analytics` - Dashboard summary
//! - `GET /api/analytics/:card_id` - Summary for one owned card

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{analytics_routes, tracking_routes};

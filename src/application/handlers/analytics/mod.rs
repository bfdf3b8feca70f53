//! Analytics handlers.
//!
//! ## Commands
//! - Recording views, saves and interactions from public card pages
//!
//! ## Queries
//! - Dashboard summary across all of a user's cards
//! - Summary for a single owned card

mod get_card_analytics;
mod get_dashboard_analytics;
mod track_event;

// Commands
pub use track_event::{TrackEventCommand, TrackEventHandler};

// Queries
pub use get_card_analytics::{GetCardAnalyticsHandler, GetCardAnalyticsQuery};
pub use get_dashboard_analytics::{GetDashboardAnalyticsHandler, GetDashboardAnalyticsQuery};

//! In-memory adapters.
//!
//! Port implementations backed by `tokio::sync::RwLock` maps. Used by the
//! handler unit tests and the HTTP integration tests.

mod analytics_store;
mod card_repository;
mod subscription_repository;

pub use analytics_store::InMemoryAnalyticsStore;
pub use card_repository::InMemoryCardRepository;
pub use subscription_repository::InMemorySubscriptionRepository;

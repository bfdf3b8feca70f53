//! HTTP adapter - REST API over axum.
//!
//! Each area has its own `dto`, `handlers` and `routes` modules. Handlers
//! build application handlers from the shared `AppState` per request and
//! map `DomainError` to responses through `ApiError`.

pub mod analytics;
pub mod cards;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod state;
pub mod subscription;
pub mod wallet;

pub use error::{ApiError, ErrorResponse};
pub use router::app_router;
pub use state::{AppState, AppUrls};

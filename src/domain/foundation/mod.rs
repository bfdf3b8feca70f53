//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types and the error
//! vocabulary shared by every other domain module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CardId, EventId, SubscriptionId, UserId};
pub use timestamp::Timestamp;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `card` - Card aggregate, profile payload and vCard export
//! - `analytics` - Event rows, date ranges and dashboard aggregation
//! - `subscription` - Plans, limits and subscription lifecycle
//! - `wallet` - Apple and Google wallet pass construction

pub mod analytics;
pub mod card;
pub mod foundation;
pub mod subscription;
pub mod wallet;

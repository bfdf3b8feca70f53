//! Subscription domain module.
//!
//! Plans, their limits, and the per-user subscription synced from the
//! payment provider.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `plan` - PlanId and PlanLimits
//! - `status` - Provider subscription status

mod aggregate;
mod plan;
mod status;

pub use aggregate::{Subscription, SubscriptionSync};
pub use plan::{PlanId, PlanLimits};
pub use status::SubscriptionStatus;
